use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::{fs, sync::mpsc};
use uuid::Uuid;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024; // 5MB
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024; // 50MB

/// Almacén de archivos subidos. Guarda bajo `dir` con nombres únicos y
/// borra en segundo plano: las bajas se encolan y un worker las procesa
/// sin bloquear la petición ni revertirla si algo falla.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
    deletions: mpsc::UnboundedSender<PathBuf>,
}

impl FileStore {
    pub async fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(deletion_worker(rx));

        Ok(Self { dir, deletions: tx })
    }

    /// Guarda `data` con un nombre único y devuelve la ruta que se persiste
    /// en la base de datos (ej: "uploads/550e8400-....jpg").
    pub async fn save(&self, original_name: &str, data: &[u8]) -> std::io::Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin");

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.dir.join(filename);

        fs::write(&path, data).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Encola rutas para borrar. Nunca falla hacia el caller: si el worker
    /// murió solo queda constancia en el log.
    pub fn schedule_delete<I>(&self, paths: I)
    where
        I: IntoIterator<Item = String>,
    {
        for path in paths {
            if self.deletions.send(PathBuf::from(&path)).is_err() {
                tracing::warn!("Worker de borrado caído, no se pudo encolar {path}");
            }
        }
    }
}

/// Borra un archivo tolerando que ya no exista.
pub async fn remove_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

async fn deletion_worker(mut rx: mpsc::UnboundedReceiver<PathBuf>) {
    while let Some(path) = rx.recv().await {
        if let Err(e) = remove_file(&path).await {
            tracing::warn!("No se pudo borrar {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn save_genera_nombres_unicos_con_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("uploads")).await.unwrap();

        let a = store.save("foto.jpg", b"abc").await.unwrap();
        let b = store.save("foto.jpg", b"def").await.unwrap();

        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert!(Path::new(&a).exists());
        assert!(Path::new(&b).exists());
    }

    #[tokio::test]
    async fn save_sin_extension_usa_bin() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("uploads")).await.unwrap();

        let path = store.save("loquesea", b"x").await.unwrap();
        assert!(path.ends_with(".bin"));
    }

    #[tokio::test]
    async fn remove_file_tolera_rutas_inexistentes() {
        assert!(remove_file(Path::new("no/existe/nada.jpg")).await.is_ok());
    }

    #[tokio::test]
    async fn el_worker_borra_lo_encolado() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("uploads")).await.unwrap();
        let path = store.save("adios.png", b"bytes").await.unwrap();

        store.schedule_delete([path.clone()]);

        for _ in 0..200 {
            if !Path::new(&path).exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("el worker no borró {path}");
    }
}
