use std::cmp::Ordering;

use crate::common::errors::{Result, RestoreError};
use crate::domain::entities::trash_entry::TrashEntry;

/// Partición determinista del trabajo entre procesos independientes.
///
/// La pertenencia de una entrada a un shard se deriva de un CRC32 de su ruta
/// destino en minúsculas, módulo el total de shards. Dos workers que acuerden
/// el mismo total obtienen particiones disjuntas sin coordinación alguna.
#[derive(Debug, Clone, Copy)]
pub struct ShardSelector {
    shard: u32,
    total: u32,
}

impl ShardSelector {
    pub fn new(shard: u32, total: u32) -> Result<Self> {
        if total == 0 {
            return Err(RestoreError::invalid_input(
                "ShardSelector",
                "total shards must be at least 1",
            ));
        }
        if shard >= total {
            return Err(RestoreError::invalid_input(
                "ShardSelector",
                format!("shard {shard} out of range for {total} shards"),
            ));
        }
        Ok(Self { shard, total })
    }

    /// Selector por defecto: un único shard, sin particionar
    pub fn single() -> Self {
        Self { shard: 0, total: 1 }
    }

    pub fn shard(&self) -> u32 {
        self.shard
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Shard al que pertenece una ruta destino. CRC32 fijo para que procesos
    /// independientes coincidan entre ejecuciones.
    pub fn shard_of(destination_path: &str, total: u32) -> u32 {
        crc32fast::hash(destination_path.to_lowercase().as_bytes()) % total
    }

    pub fn contains(&self, destination_path: &str) -> bool {
        self.total == 1 || Self::shard_of(destination_path, self.total) == self.shard
    }
}

/// Sub-rango posicional `[from, to]` (fin inclusivo) sobre el plan post-shard.
/// Sirve para reanudar ejecuciones largas por tramos.
#[derive(Debug, Clone, Copy)]
pub struct IndexRange {
    pub from: usize,
    pub to: Option<usize>,
}

impl IndexRange {
    pub fn new(from: usize, to: Option<usize>) -> Self {
        Self { from, to }
    }

    /// Rango completo, sin recorte
    pub fn full() -> Self {
        Self { from: 0, to: None }
    }
}

/// Secuencia ordenada, filtrada y particionada de entradas a procesar en una
/// ejecución. Se construye una vez y no cambia después.
#[derive(Debug, Clone)]
pub struct RestorePlan {
    entries: Vec<TrashEntry>,
}

impl RestorePlan {
    /// Construye el plan: ordena el catálogo, filtra por shard y recorta el
    /// sub-rango posicional.
    pub fn build(catalog: Vec<TrashEntry>, selector: &ShardSelector, range: &IndexRange) -> Self {
        let mut entries = catalog;
        entries.sort_by(plan_order);
        entries.retain(|entry| selector.contains(&entry.destination_path));

        let start = range.from.min(entries.len());
        let mut entries = entries.split_off(start);
        if let Some(to) = range.to {
            let keep = to.checked_sub(range.from).map(|span| span + 1).unwrap_or(0);
            entries.truncate(keep);
        }

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrashEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Orden total del plan: directorios antes que archivos, rutas menos profundas
/// antes que las profundas, y desempate lexicográfico por ruta destino. Los
/// padres siempre son menos profundos que sus hijos, así que un directorio
/// presente en la papelera se procesa antes que cualquier entrada bajo él.
fn plan_order(a: &TrashEntry, b: &TrashEntry) -> Ordering {
    b.is_directory()
        .cmp(&a.is_directory())
        .then_with(|| a.depth().cmp(&b.depth()))
        .then_with(|| a.destination_path.cmp(&b.destination_path))
}
