use chrono::{DateTime, Utc};

use crate::common::errors::{Result, RestoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Un elemento descubierto en la papelera del servidor, con los metadatos
/// necesarios para restaurarlo. Inmutable tras su creación.
#[derive(Debug, Clone)]
pub struct TrashEntry {
    /// Localizador del objeto dentro de la papelera (ruta con raíz en el servidor)
    pub source_ref: String,
    /// Ruta relativa bajo la raíz de archivos del usuario donde debe restaurarse
    pub destination_path: String,
    pub kind: EntryKind,
    /// Instante de borrado; solo se usa para el filtro de corte
    pub deleted_at: DateTime<Utc>,
    /// Nombre original, solo informativo
    pub display_name: String,
}

impl TrashEntry {
    /// Crea una entrada normalizando la ruta destino: sin separador inicial ni
    /// final, nunca vacía.
    pub fn new(
        source_ref: String,
        destination_path: &str,
        kind: EntryKind,
        deleted_at: DateTime<Utc>,
        display_name: String,
    ) -> Result<Self> {
        let normalized = destination_path.trim_matches('/');
        if normalized.is_empty() {
            return Err(RestoreError::invalid_input(
                "TrashEntry",
                format!("empty destination path for {source_ref}"),
            ));
        }
        Ok(Self {
            source_ref,
            destination_path: normalized.to_string(),
            kind,
            deleted_at,
            display_name,
        })
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Número de segmentos de la ruta destino
    pub fn depth(&self) -> usize {
        self.destination_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .count()
    }

    /// Ruta del directorio padre del destino, si no cuelga de la raíz
    pub fn parent_path(&self) -> Option<&str> {
        self.destination_path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(destination: &str) -> Result<TrashEntry> {
        TrashEntry::new(
            "/remote.php/dav/trash-bin/admin/1".to_string(),
            destination,
            EntryKind::File,
            Utc::now(),
            "x".to_string(),
        )
    }

    #[test]
    fn destination_is_normalized() {
        let e = entry("/Projects/notes.txt").unwrap();
        assert_eq!(e.destination_path, "Projects/notes.txt");
        let e = entry("Projects/sub/").unwrap();
        assert_eq!(e.destination_path, "Projects/sub");
    }

    #[test]
    fn empty_destination_is_rejected() {
        assert!(entry("").is_err());
        assert!(entry("///").is_err());
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(entry("a.txt").unwrap().depth(), 1);
        assert_eq!(entry("a/b/c.txt").unwrap().depth(), 3);
    }

    #[test]
    fn parent_path_of_root_level_entry_is_none() {
        assert_eq!(entry("a.txt").unwrap().parent_path(), None);
        assert_eq!(entry("a/b/c.txt").unwrap().parent_path(), Some("a/b"));
    }
}
