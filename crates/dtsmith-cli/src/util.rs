use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a source file, `-` meaning standard input.
pub fn load_source(path: &Path) -> String {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| {
                eprintln!("error: failed to read stdin: {e}");
                std::process::exit(1);
            });
        return buf;
    }
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(1);
    })
}

/// Module name derived from the source path: the file stem, with stdin
/// falling back to a generic name.
pub fn module_name_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| *s != "-")
        .unwrap_or("module")
        .to_string()
}

#[cfg(test)]
mod util_tests {
    use super::*;

    #[test]
    fn module_name_is_the_file_stem() {
        assert_eq!(module_name_of(Path::new("lib/index.js")), "index");
        assert_eq!(module_name_of(Path::new("widget.min.js")), "widget.min");
        assert_eq!(module_name_of(Path::new("-")), "module");
    }
}
