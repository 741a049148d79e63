//! Catalog data model and the PokeAPI wire shapes it is mapped from.

use serde::Deserialize;

use crate::artwork::artwork_url;

/// One entry of a catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub source_url: String,
    /// Artwork derived from the numeric id in `source_url`.
    pub image_url: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, source_url: impl Into<String>, template: &str) -> Self {
        let source_url = source_url.into();
        let image_url = artwork_url(&source_url, template);
        Self {
            name: name.into(),
            source_url,
            image_url,
        }
    }
}

/// Position in the paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageCursor {
    /// The first page, built from the configured list URL and page size.
    First,
    /// A `next`/`previous` URL handed out by the remote source, used verbatim.
    Url(String),
}

impl PageCursor {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            PageCursor::First => None,
            PageCursor::Url(url) => Some(url),
        }
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageCursor::First => write!(f, "<first>"),
            PageCursor::Url(url) => write!(f, "{}", url),
        }
    }
}

/// A single page of the catalog with the cursors to its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub next: Option<PageCursor>,
    pub previous: Option<PageCursor>,
    /// Total number of entries across all pages, as reported by the source.
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub base_stat: u32,
}

/// Full record for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub abilities: Vec<Ability>,
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
    pub moves: Vec<String>,
    pub sprite_url: Option<String>,
}

// ── Wire format ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

impl ListResponse {
    /// Map the wire response into a page, deriving artwork URLs with `template`.
    pub fn into_page(self, template: &str) -> CatalogPage {
        CatalogPage {
            entries: self
                .results
                .into_iter()
                .map(|r| CatalogEntry::new(r.name, r.url, template))
                .collect(),
            next: self.next.map(PageCursor::Url),
            previous: self.previous.map(PageCursor::Url),
            total_count: self.count,
        }
    }
}

impl From<DetailResponse> for EntryDetail {
    fn from(r: DetailResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            height: r.height,
            weight: r.weight,
            abilities: r
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    url: a.ability.url,
                })
                .collect(),
            types: r.types.into_iter().map(|t| t.kind.name).collect(),
            stats: r
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base_stat: s.base_stat,
                })
                .collect(),
            moves: r.moves.into_iter().map(|m| m.move_.name).collect(),
            sprite_url: r.sprites.front_default,
        }
    }
}
