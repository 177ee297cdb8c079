#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script used as a stand-in encoder.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A fake encoder that reports a modern version banner, records its
/// argument vector next to the output file and creates the output.
pub fn write_fake_encoder(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-ffmpeg",
        r#"if [ "$1" = "-version" ]; then
  echo "ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers"
  exit 0
fi
for arg; do out="$arg"; done
printf '%s\n' "$@" > "$out.args"
printf 'encoded' > "$out"
exit 0
"#,
    )
}

/// A tiny but genuinely decodable background image.
pub fn write_background(dir: &Path) -> PathBuf {
    let path = dir.join("background.png");
    image::RgbImage::new(8, 8).save(&path).unwrap();
    path
}

pub fn write_music(dir: &Path) -> PathBuf {
    let path = dir.join("music.mp3");
    fs::write(&path, b"not really audio, never decoded by the fake tool").unwrap();
    path
}
