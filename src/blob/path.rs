//! Blob name composition
//!
//! Folders are virtual in Blob Storage: a "directory" is nothing more than a
//! `/`-delimited prefix of the blob name.

/// True when the directory denotes the container root
pub fn is_root_directory(directory: Option<&str>) -> bool {
    match directory {
        None => true,
        Some(dir) => {
            let trimmed = dir.trim();
            trimmed.is_empty() || trimmed == "."
        }
    }
}

/// Join a directory and a file name into a blob name
///
/// Any path already present in `filename` is discarded in favour of
/// `directory`. A root directory leaves `filename` untouched.
pub fn add_directory_to_filename(directory: Option<&str>, filename: &str) -> String {
    let Some(dir) = directory.filter(|_| !is_root_directory(directory)) else {
        return filename.to_string();
    };

    let trimmed_filename = match filename.rfind('/') {
        Some(idx) => &filename[idx + 1..],
        None => filename,
    };

    if dir.ends_with('/') {
        format!("{dir}{trimmed_filename}")
    } else {
        format!("{dir}/{trimmed_filename}")
    }
}

/// Listing prefix for a directory filter, `None` meaning the whole container
pub fn list_prefix(directory: Option<&str>) -> Option<String> {
    if is_root_directory(directory) {
        return None;
    }
    directory.map(|dir| {
        if dir.ends_with('/') {
            dir.to_string()
        } else {
            format!("{dir}/")
        }
    })
}
