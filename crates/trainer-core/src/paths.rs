use std::path::PathBuf;

use crate::config::ConfigPaths;

pub fn expand_path_template(template: &str, paths: &ConfigPaths) -> PathBuf {
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
    let replaced = template
        .replace("${DATA_DIR}", &paths.data_dir.to_string_lossy())
        .replace("${CONFIG_DIR}", &paths.config_dir.to_string_lossy())
        .replace("${HOME}", &home_dir);
    PathBuf::from(replaced)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_expands_data_and_config_dirs() {
        let paths = ConfigPaths {
            config_path: PathBuf::from("/etc/bt/config.toml"),
            config_dir: PathBuf::from("/etc/bt"),
            data_dir: PathBuf::from("/var/lib/bt"),
        };
        assert_eq!(
            expand_path_template("${DATA_DIR}/user_feedback.json", &paths),
            Path::new("/var/lib/bt/user_feedback.json")
        );
        assert_eq!(
            expand_path_template("${CONFIG_DIR}/beers.csv", &paths),
            Path::new("/etc/bt/beers.csv")
        );
        assert_eq!(expand_path_template("beers.csv", &paths), Path::new("beers.csv"));
    }
}
