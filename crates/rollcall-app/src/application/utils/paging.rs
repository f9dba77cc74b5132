/// `skip`/`limit` after clamping to the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    /// A missing limit falls back to `default`; the result always lies in
    /// `[1, max]`.
    pub fn clamp(skip: Option<u32>, limit: Option<u32>, default: u32, max: u32) -> Self {
        let max = max.max(1);
        let limit = limit.unwrap_or(default);
        Self {
            skip: skip.unwrap_or(0),
            limit: limit.clamp(1, max),
        }
    }
}
