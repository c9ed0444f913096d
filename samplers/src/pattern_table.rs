//! Sample pattern table.
//!
//! `NUM_PMJ_PATTERNS` independent 2D patterns of `NUM_PMJ_SAMPLES` points
//! each, stored pattern-major with interleaved x and y. The table is built
//! (or loaded) once and never mutated; all sampling threads share one `Arc`.

use crate::pmj::generate_pmj02_patterns;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use kernel::geometry::Point2f;
use kernel::math::Float;
use kernel::{stat_inc, stat_memory_counter, stat_register_fns};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::{Arc, OnceLock};

/// Number of divisions per axis of a pattern.
pub const NUM_PMJ_DIVISIONS: usize = 32;

/// Number of points in a pattern.
pub const NUM_PMJ_SAMPLES: usize = NUM_PMJ_DIVISIONS * NUM_PMJ_DIVISIONS;

/// Number of patterns in the table.
pub const NUM_PMJ_PATTERNS: usize = 64;

/// Number of floats in the table.
pub const PMJ_TABLE_LEN: usize = 2 * NUM_PMJ_PATTERNS * NUM_PMJ_SAMPLES;

/// Magic bytes of a baked table.
const BAKED_MAGIC: &[u8; 4] = b"PMJT";

/// Version of the baked table format.
const BAKED_VERSION: u32 = 1;

stat_memory_counter!("Memory/Sample pattern table", PATTERN_TABLE_MEMORY, pattern_table_stats_memory);

stat_register_fns!(pattern_table_stats_memory);

/// Process-wide table slot.
fn global_slot() -> &'static OnceLock<Arc<SamplePatternTable>> {
    static TABLE: OnceLock<Arc<SamplePatternTable>> = OnceLock::new();
    &TABLE
}

/// Immutable table of PMJ sample patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePatternTable {
    /// `PMJ_TABLE_LEN` values in [0, 1).
    values: Vec<Float>,
}

impl SamplePatternTable {
    /// Generates the table using all available cores.
    pub fn generate() -> Self {
        let values = generate_pmj02_patterns(num_cpus::get());
        info!("Generated sample pattern table ({NUM_PMJ_PATTERNS} patterns, {NUM_PMJ_SAMPLES} samples each)");
        Self::new_unchecked(values)
    }

    /// Returns a table from raw values after validating them.
    ///
    /// * `values` - `PMJ_TABLE_LEN` values, pattern-major, x and y interleaved.
    pub fn from_values(values: Vec<Float>) -> Result<Self, String> {
        if values.len() != PMJ_TABLE_LEN {
            return Err(format!(
                "Sample pattern table must hold {PMJ_TABLE_LEN} values, got {}",
                values.len()
            ));
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && (0.0..1.0).contains(*v)))
        {
            return Err(format!("Sample pattern table value {i} out of range [0, 1): {v}"));
        }
        Ok(Self::new_unchecked(values))
    }

    fn new_unchecked(values: Vec<Float>) -> Self {
        register_stats();
        stat_inc!(PATTERN_TABLE_MEMORY, (values.len() * std::mem::size_of::<Float>()) as u64);
        Self { values }
    }

    /// Returns the raw value at `index`. Used by the sample generator.
    ///
    /// * `index` - Index into the interleaved table.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Float {
        self.values[index]
    }

    /// Returns a point of a pattern.
    ///
    /// * `pattern` - Pattern index.
    /// * `slot`    - Point index within the pattern.
    pub fn point(&self, pattern: usize, slot: usize) -> Point2f {
        let i = 2 * (pattern * NUM_PMJ_SAMPLES + slot);
        Point2f::new(self.values[i], self.values[i + 1])
    }

    /// Returns the interleaved points of a pattern.
    ///
    /// * `pattern` - Pattern index.
    pub fn pattern(&self, pattern: usize) -> &[Float] {
        let start = 2 * pattern * NUM_PMJ_SAMPLES;
        &self.values[start..start + 2 * NUM_PMJ_SAMPLES]
    }

    /// Returns all values.
    pub fn values(&self) -> &[Float] {
        &self.values
    }

    /// Reads a baked table.
    ///
    /// * `reader` - The source.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, String> {
        let mut magic = [0_u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| format!("Error reading sample pattern table header: {e}"))?;
        if &magic != BAKED_MAGIC {
            return Err(format!("Invalid sample pattern table magic {magic:?}"));
        }

        let mut read_u32 = |what: &str| {
            reader
                .read_u32::<LittleEndian>()
                .map_err(|e| format!("Error reading sample pattern table {what}: {e}"))
        };
        let version = read_u32("version")?;
        let patterns = read_u32("pattern count")? as usize;
        let samples = read_u32("sample count")? as usize;

        if version != BAKED_VERSION {
            return Err(format!("Unsupported sample pattern table version {version}"));
        }
        if patterns != NUM_PMJ_PATTERNS || samples != NUM_PMJ_SAMPLES {
            return Err(format!(
                "Sample pattern table has {patterns} patterns of {samples} samples, expected {NUM_PMJ_PATTERNS} of {NUM_PMJ_SAMPLES}"
            ));
        }

        let mut values = vec![0.0; PMJ_TABLE_LEN];
        reader
            .read_f32_into::<LittleEndian>(&mut values)
            .map_err(|e| format!("Error reading sample pattern table values: {e}"))?;

        Self::from_values(values)
    }

    /// Writes the table in the baked format.
    ///
    /// * `writer` - The destination.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), String> {
        let header = |e: std::io::Error| format!("Error writing sample pattern table header: {e}");
        writer.write_all(BAKED_MAGIC).map_err(header)?;
        writer.write_u32::<LittleEndian>(BAKED_VERSION).map_err(header)?;
        writer.write_u32::<LittleEndian>(NUM_PMJ_PATTERNS as u32).map_err(header)?;
        writer.write_u32::<LittleEndian>(NUM_PMJ_SAMPLES as u32).map_err(header)?;
        for v in self.values.iter() {
            writer
                .write_f32::<LittleEndian>(*v)
                .map_err(|e| format!("Error writing sample pattern table values: {e}"))?;
        }
        Ok(())
    }

    /// Loads a baked table from a file.
    ///
    /// * `path` - The file path.
    pub fn load(path: &str) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("Error opening sample pattern table '{path}': {e}"))?;
        let table = Self::read(&mut BufReader::new(file)).map_err(|e| {
            error!("Rejected sample pattern table '{path}': {e}");
            format!("'{path}': {e}")
        })?;
        info!("Loaded sample pattern table from '{path}'");
        Ok(table)
    }

    /// Saves the table to a file.
    ///
    /// * `path` - The file path.
    pub fn save(&self, path: &str) -> Result<(), String> {
        let file = File::create(path).map_err(|e| format!("Error creating sample pattern table '{path}': {e}"))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer
            .flush()
            .map_err(|e| format!("Error writing sample pattern table '{path}': {e}"))
    }

    /// Returns the process-wide table, generating it on first use.
    pub fn global() -> Arc<Self> {
        Arc::clone(global_slot().get_or_init(|| Arc::new(Self::generate())))
    }

    /// Installs the process-wide table. Must happen before the first call to
    /// `global()`; a table cannot be replaced once rendering may have read it.
    ///
    /// * `table` - The table.
    pub fn install(table: Self) -> Result<Arc<Self>, String> {
        let table = Arc::new(table);
        global_slot()
            .set(Arc::clone(&table))
            .map_err(|_| "Sample pattern table is already initialized".to_string())?;
        Ok(table)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
