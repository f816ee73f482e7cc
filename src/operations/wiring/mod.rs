mod resolve_chains;

pub use resolve_chains::{ChainReport, ChainTail, ResolveChains};
