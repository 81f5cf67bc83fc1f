use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

pub const TONE_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Command-line players tried in order until one spawns.
const PLAYERS: [(&str, &[&str]); 5] = [
    ("paplay", &[]),
    ("aplay", &["-q"]),
    ("afplay", &[]),
    ("mpg123", &["-q"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
];

pub trait Sound {
    fn play(&mut self);
    fn stop(&mut self);
}

pub trait SoundLoader {
    /// `None` means "no sound": callers keep going silently.
    fn load(&self, path: &Path) -> Option<Box<dyn Sound>>;
}

pub fn is_tone(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TONE_EXTENSIONS.iter().any(|t| e.eq_ignore_ascii_case(t)))
}

/// Lists the alarm tones in `dir`, sorted by file name.
pub fn scan_tones(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list tones");
            return Vec::new();
        }
    };

    let mut tones: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_tone(path))
        .collect();
    tones.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tones
}

/// Plays tones by spawning an external audio player.
#[derive(Debug, Default)]
pub struct PlayerLoader;

impl SoundLoader for PlayerLoader {
    fn load(&self, path: &Path) -> Option<Box<dyn Sound>> {
        if !is_tone(path) || !path.is_file() {
            tracing::warn!(tone = %path.display(), "no sound found for tone");
            return None;
        }
        Some(Box::new(PlayerSound {
            path: path.to_path_buf(),
            child: None,
        }))
    }
}

struct PlayerSound {
    path: PathBuf,
    child: Option<Child>,
}

impl Sound for PlayerSound {
    fn play(&mut self) {
        self.stop();
        for (cmd, args) in PLAYERS {
            let spawned = Command::new(cmd)
                .args(args)
                .arg(&self.path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if let Ok(child) = spawned {
                tracing::debug!(player = cmd, tone = %self.path.display(), "playing tone");
                self.child = Some(child);
                return;
            }
        }
        tracing::warn!(tone = %self.path.display(), "no audio player available");
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for PlayerSound {
    fn drop(&mut self) {
        self.stop();
    }
}
