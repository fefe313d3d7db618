//! Tile name → download URL resolution.
//!
//! A [`Resolver`] answers "where do I download this tile from" by
//! consulting the cached index of a source, regenerating it first when it
//! is missing or stale. Not finding a tile is an ordinary `Ok(None)`;
//! only structural problems (unreachable listing, unreadable index) are
//! errors, and they are never reported as not-found.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::index::IndexStore;
use crate::listing::RemoteListing;
use crate::source::{Source, SourceKind};

pub struct Resolver<'a> {
    cfg: &'a Config,
    store: IndexStore<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(cfg: &'a Config, listing: &'a dyn RemoteListing) -> Self {
        Self {
            cfg,
            store: IndexStore::new(cfg, listing),
        }
    }

    /// Download URL of a tile from one source, or `None` if the source
    /// does not provide it.
    pub fn resolve(&self, tile: &str, source: Source) -> Result<Option<String>> {
        let index = self.store.load(source)?;
        match source.kind {
            SourceKind::Srtm => {
                let server = self.cfg.srtm_server(source.resolution);
                // the server historically listed some archives without the
                // dot before "hgt.zip"; tolerate both spellings
                let archive = format!("{tile}.hgt.zip");
                let faulty = format!("{tile}hgt.zip");
                for candidate in [archive, faulty] {
                    if let Some(dir) = index.section_of(&candidate) {
                        return Ok(Some(format!("{server}/{dir}/{candidate}")));
                    }
                }
                Ok(None)
            }
            SourceKind::View => {
                // membership reflects the reconciled index: a tile the
                // coverage map once claimed but the archive lacked stays
                // unresolved
                for (url, members) in index.sections() {
                    if members.iter().any(|member| member == tile) {
                        return Ok(Some(url.to_string()));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Try each source in the supplied order, returning the first hit.
    /// Exhausting all sources is `Ok(None)`: the tile is unavailable,
    /// which the caller reports rather than retries.
    pub fn resolve_with_fallback(
        &self,
        tile: &str,
        sources: &[Source],
    ) -> Result<Option<(Source, String)>> {
        for &source in sources {
            debug!("{tile}: trying {source}");
            if let Some(url) = self.resolve(tile, source)? {
                return Ok(Some((source, url)));
            }
        }
        Ok(None)
    }
}
