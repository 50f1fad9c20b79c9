//! Checkpointing of a running game with a checksummed binary format.
//!
//! Quitting mid-run writes the whole [`GameState`] here; the next launch
//! offers to resume it. The file is deleted once the run ends.

use crate::game::GameState;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Magic word at the front of a checkpoint file. Bumping the low byte
/// invalidates old checkpoints after a breaking state change.
const CHECKPOINT_MAGIC: u64 = 0x5345_5250_454E_5401;

/// Manages the single quit-and-resume checkpoint file.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Sets up the platform config directory via the `directories` crate.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "serpent").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("checkpoint.dat"),
        })
    }

    /// File format:
    /// - magic word (8 bytes)
    /// - data length (4 bytes)
    /// - bincode-serialized game state (variable)
    /// - SHA-256 checksum over the three sections above (32 bytes)
    pub fn save(&self, state: &GameState) -> io::Result<()> {
        let data = bincode::serialize(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(CHECKPOINT_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&CHECKPOINT_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        Ok(())
    }

    /// Load and verify the checkpoint. Fails on a missing file, a foreign
    /// magic word, a checksum mismatch, or undecodable state.
    pub fn load(&self) -> io::Result<GameState> {
        let mut file = fs::File::open(&self.save_path)?;

        let mut magic_bytes = [0u8; 8];
        file.read_exact(&mut magic_bytes)?;
        let magic = u64::from_le_bytes(magic_bytes);
        if magic != CHECKPOINT_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid checkpoint magic: expected 0x{:016X}, got 0x{:016X}",
                    CHECKPOINT_MAGIC, magic
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(magic_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed = hasher.finalize();

        if stored_checksum != computed.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Remove the checkpoint; a finished run leaves nothing to resume.
    pub fn delete(&self) -> io::Result<()> {
        if self.exists() {
            fs::remove_file(&self.save_path)?;
        }
        Ok(())
    }
}
