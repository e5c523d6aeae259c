//! Memory Region Types
//!
//! Data structures for representing memory regions from /proc/pid/maps.

/// A memory region from /proc/pid/maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: usize,
    pub end: usize,
    pub perms: String,
    pub offset: usize,
    pub path: Option<String>,
}

impl MemoryRegion {
    /// Parse one line of /proc/pid/maps
    ///
    /// `7f0000000000-7f0000001000 r--p 00000000 08:01 1234  /path/to/file`
    pub fn from_maps_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let (start, end) = parts.next()?.split_once('-')?;
        let start = usize::from_str_radix(start, 16).ok()?;
        let end = usize::from_str_radix(end, 16).ok()?;
        if end < start {
            return None;
        }

        let perms = parts.next().unwrap_or("").to_string();
        let offset = parts
            .next()
            .and_then(|s| usize::from_str_radix(s, 16).ok())
            .unwrap_or(0);

        // device, inode
        let path = parts.nth(2).map(|s| s.to_string());

        Some(MemoryRegion {
            start,
            end,
            perms,
            offset,
            path,
        })
    }

    pub fn size(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, address: usize) -> bool {
        address >= self.start && address < self.end
    }

    pub fn is_readable(&self) -> bool {
        self.perms.starts_with('r')
    }

    pub fn is_executable(&self) -> bool {
        self.perms.chars().nth(2) == Some('x')
    }

    /// Whether this region is backed by a file whose name ends with `suffix`
    /// (compared case-insensitively, Proton paths keep Windows casing)
    pub fn path_ends_with(&self, suffix: &str) -> bool {
        let suffix = suffix.to_lowercase();
        self.path
            .as_ref()
            .map(|p| p.to_lowercase().ends_with(&suffix))
            .unwrap_or(false)
    }
}
