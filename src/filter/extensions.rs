/// File extensions that never lead to crawlable HTML
///
/// Covers stylesheets and scripts, images, audio and video, archives, office
/// documents, binaries and data dumps.
pub const BLOCKED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx",
    "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar", "gz",
];

/// Returns the blocked extension a path ends with, if any
///
/// Matching is case-insensitive and requires the `.` separator, so
/// `/download/gz` is not blocked while `/x/report.PDF` is.
///
/// # Examples
///
/// ```
/// use weir::filter::blocked_extension;
///
/// assert_eq!(blocked_extension("/x/report.pdf"), Some("pdf"));
/// assert_eq!(blocked_extension("/x/page.html"), None);
/// ```
pub fn blocked_extension(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    BLOCKED_EXTENSIONS.iter().copied().find(|blocked| *blocked == ext)
}
