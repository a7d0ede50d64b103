use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE, generate_config_template};
use crate::fs::{FileSystem, default_fs};
use crate::style;
use std::io;

pub fn cmd_init(args: InitArgs) -> i32 {
    cmd_init_with_fs(args, default_fs())
}

pub fn cmd_init_with_fs(args: InitArgs, fs: &dyn FileSystem) -> i32 {
    let config_path = args.path.join(CONFIG_FILE);
    let template = generate_config_template();

    match fs.create_new(&config_path, template.as_bytes()) {
        Ok(()) => {
            style::success(&format!(
                "Created {} at {}",
                CONFIG_FILE,
                style::path(&config_path)
            ));
            0
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            style::error(&format!(
                "{} already exists at {}",
                CONFIG_FILE,
                style::path(&config_path)
            ));
            1
        }
        Err(e) => {
            style::error(&format!("Failed to write config file: {}", e));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_init_writes_template() {
        let fs = MockFs::new();
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/project"),
            },
            &fs,
        );
        assert_eq!(code, 0);
        let written = fs.contents(Path::new("/project/.ringlens.toml")).unwrap();
        assert!(written.contains("base_url"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let fs = MockFs::with_files([(Path::new("/project/.ringlens.toml"), "keep me")]);
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/project"),
            },
            &fs,
        );
        assert_eq!(code, 1);
        assert_eq!(
            fs.contents(Path::new("/project/.ringlens.toml")).unwrap(),
            "keep me"
        );
    }
}
