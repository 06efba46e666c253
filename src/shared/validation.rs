use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for file extensions carried over into stored names
    /// Must be 1-16 lowercase ASCII alphanumerics
    /// - Valid: "pdf", "jpeg", "mp4", "7z"
    /// - Invalid: "", "tar.gz", "PDF", "p df", "exe/..", "résumé"
    pub static ref EXTENSION_REGEX: Regex = Regex::new(r"^[a-z0-9]{1,16}$").unwrap();

    /// Regex for stored names produced by the content store
    /// 32 lowercase hex characters (UUID v7, simple form) and an optional extension
    /// - Valid: "0191e4b2a7c07e3f9d5b1c2a3b4c5d6e", "0191e4b2a7c07e3f9d5b1c2a3b4c5d6e.pdf"
    /// - Invalid: "../etc/passwd", ".hidden", "report.pdf", "0191E4B2A7C07E3F9D5B1C2A3B4C5D6E"
    pub static ref STORED_NAME_REGEX: Regex =
        Regex::new(r"^[0-9a-f]{32}(\.[a-z0-9]{1,16})?$").unwrap();
}
