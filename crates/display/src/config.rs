//! Window configuration

use protocol::DisplayGeometry;

/// How the phosphor window is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Initial title; replaced by status updates.
    pub title: String,
    /// Side of the square surface in pixels, one pixel per cell.
    pub size: u32,
}

impl WindowConfig {
    /// Title shown until the first status update.
    pub const DEFAULT_TITLE: &'static str = "VC8 Display";

    /// Window for a display geometry.
    pub fn for_geometry(geometry: DisplayGeometry) -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_owned(),
            size: geometry.size(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::for_geometry(DisplayGeometry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Magnification;

    #[test]
    fn size_follows_geometry() {
        assert_eq!(WindowConfig::default().size, 512);
        let large = WindowConfig::for_geometry(DisplayGeometry::new(Magnification::X2));
        assert_eq!(large.size, 1024);
        assert_eq!(large.title, "VC8 Display");
    }
}
