/// HTTP endpoint paths.
pub mod endpoints {
    pub const HASH: &str = "/hash";
    /// Route pattern for a single hash; the segment is the decimal id.
    pub const HASH_BY_ID: &str = "/hash/:id";
    pub const STATS: &str = "/stats";
    pub const SHUTDOWN: &str = "/shutdown";

    /// Concrete path for fetching hash `id`.
    pub fn hash_path(id: u64) -> String {
        format!("{HASH}/{id}")
    }
}
