//! Output tables in transmart-copy format.
//!
//! Every table is a tab-separated file with a header row, in one of two
//! directories:
//!
//! ```text
//! <output_dir>/
//! ├── i2b2metadata/
//! │   ├── dimension_description.tsv
//! │   ├── study_dimension_descriptions.tsv
//! │   ├── i2b2_secure.tsv
//! │   └── i2b2_tags.tsv
//! └── i2b2demodata/
//!     ├── concept_dimension.tsv
//!     ├── modifier_dimension.tsv
//!     ├── study.tsv
//!     ├── trial_visit_dimension.tsv
//!     ├── patient_dimension.tsv
//!     ├── patient_mapping.tsv
//!     ├── visit_dimension.tsv
//!     ├── encounter_mapping.tsv
//!     ├── observation_fact.tsv
//!     ├── relation_type.tsv
//!     └── relation.tsv
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::types::{CopyError, CopyResult};

/// Directory for metadata tables.
pub const METADATA_DIR: &str = "i2b2metadata";

/// Directory for data tables.
pub const DEMODATA_DIR: &str = "i2b2demodata";

/// The tables of a transmart-copy data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Concept dimension.
    Concepts,
    /// Modifier dimension.
    Modifiers,
    /// Dimension descriptions.
    Dimensions,
    /// Links between studies and dimension descriptions.
    StudyDimensions,
    /// Studies.
    Studies,
    /// Trial visit dimension.
    TrialVisits,
    /// Patient dimension.
    Patients,
    /// Patient identifier mappings.
    PatientMappings,
    /// Visit dimension.
    Visits,
    /// Visit identifier mappings.
    VisitMappings,
    /// Ontology nodes.
    TreeNodes,
    /// Ontology node tags.
    Tags,
    /// Observation facts.
    Observations,
    /// Relation types.
    RelationTypes,
    /// Relations between subjects.
    Relations,
}

impl Table {
    /// Number of tables.
    pub const COUNT: usize = 15;

    /// All tables, in the order they are opened.
    pub const ALL: [Table; Table::COUNT] = [
        Table::Concepts,
        Table::Modifiers,
        Table::Dimensions,
        Table::StudyDimensions,
        Table::Studies,
        Table::TrialVisits,
        Table::Patients,
        Table::PatientMappings,
        Table::Visits,
        Table::VisitMappings,
        Table::TreeNodes,
        Table::Tags,
        Table::Observations,
        Table::RelationTypes,
        Table::Relations,
    ];

    /// Position of the table in [`Table::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Directory the table file lives in.
    pub fn directory(self) -> &'static str {
        match self {
            Table::Dimensions | Table::StudyDimensions | Table::TreeNodes | Table::Tags => {
                METADATA_DIR
            }
            _ => DEMODATA_DIR,
        }
    }

    /// File name of the table.
    pub fn file_name(self) -> &'static str {
        match self {
            Table::Concepts => "concept_dimension.tsv",
            Table::Modifiers => "modifier_dimension.tsv",
            Table::Dimensions => "dimension_description.tsv",
            Table::StudyDimensions => "study_dimension_descriptions.tsv",
            Table::Studies => "study.tsv",
            Table::TrialVisits => "trial_visit_dimension.tsv",
            Table::Patients => "patient_dimension.tsv",
            Table::PatientMappings => "patient_mapping.tsv",
            Table::Visits => "visit_dimension.tsv",
            Table::VisitMappings => "encounter_mapping.tsv",
            Table::TreeNodes => "i2b2_secure.tsv",
            Table::Tags => "i2b2_tags.tsv",
            Table::Observations => "observation_fact.tsv",
            Table::RelationTypes => "relation_type.tsv",
            Table::Relations => "relation.tsv",
        }
    }

    /// Path of the table file relative to the output directory.
    pub fn relative_path(self) -> PathBuf {
        Path::new(self.directory()).join(self.file_name())
    }

    /// Column names, in order.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Table::Concepts => &["concept_cd", "concept_path", "name_char"],
            Table::Modifiers => &["modifier_cd", "modifier_path", "name_char"],
            Table::Dimensions => &[
                "id",
                "name",
                "modifier_code",
                "value_type",
                "dimension_type",
                "sort_index",
            ],
            Table::StudyDimensions => &["study_id", "dimension_description_id"],
            Table::Studies => &["study_num", "study_id", "secure_obj_token", "study_blob"],
            Table::TrialVisits => &[
                "trial_visit_num",
                "study_num",
                "rel_time_unit_cd",
                "rel_time_num",
                "rel_time_label",
            ],
            Table::Patients => &["patient_num", "sex_cd"],
            Table::PatientMappings => &["patient_ide", "patient_ide_source", "patient_num"],
            Table::Visits => &[
                "encounter_num",
                "patient_num",
                "active_status_cd",
                "start_date",
                "end_date",
                "inout_cd",
                "location_cd",
                "location_path",
                "length_of_stay",
                "visit_blob",
            ],
            Table::VisitMappings => &["encounter_ide", "encounter_ide_source", "encounter_num"],
            Table::TreeNodes => &[
                "c_hlevel",
                "c_fullname",
                "c_name",
                "c_visualattributes",
                "c_basecode",
                "c_facttablecolumn",
                "c_tablename",
                "c_columnname",
                "c_columndatatype",
                "c_operator",
                "c_dimcode",
                "secure_obj_token",
            ],
            Table::Tags => &["tag_id", "path", "tag", "tag_type", "tags_idx", "tag_option_id"],
            Table::Observations => &[
                "encounter_num",
                "patient_num",
                "concept_cd",
                "provider_id",
                "start_date",
                "end_date",
                "modifier_cd",
                "instance_num",
                "trial_visit_num",
                "valtype_cd",
                "tval_char",
                "nval_num",
                "observation_blob",
            ],
            Table::RelationTypes => &["id", "label", "description", "symmetrical", "biological"],
            Table::Relations => &[
                "left_subject_id",
                "relation_type_id",
                "right_subject_id",
                "biological",
                "share_household",
            ],
        }
    }
}

/// Creates the output directory if it does not exist.
///
/// Fails if the path exists and is not a directory, or is a non-empty
/// directory.
pub fn prepare_output_dir(output_dir: &Path) -> CopyResult<()> {
    if !output_dir.exists() {
        tracing::info!("Creating output directory: {}", output_dir.display());
        fs::create_dir_all(output_dir)?;
    }
    if !output_dir.is_dir() {
        return Err(CopyError::DestinationConflict {
            path: output_dir.display().to_string(),
            reason: "path is not a directory".to_string(),
        });
    }
    if fs::read_dir(output_dir)?.next().is_some() {
        return Err(CopyError::DestinationConflict {
            path: output_dir.display().to_string(),
            reason: "directory is not empty".to_string(),
        });
    }
    Ok(())
}

/// A single tab-separated output table.
///
/// The file is created when the table is opened and fails if it already
/// exists. The underlying writer flushes when dropped, so the file is
/// released on every exit path.
pub struct TableWriter {
    table: Table,
    writer: Writer<File>,
}

impl TableWriter {
    /// Creates the table file under `output_dir` and writes the header row.
    pub fn create(output_dir: &Path, table: Table) -> CopyResult<Self> {
        let path = output_dir.join(table.relative_path());
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(file);
        writer.write_record(table.header())?;
        Ok(Self { table, writer })
    }

    /// Appends one row.
    pub fn write_row(&mut self, row: &[String]) -> CopyResult<()> {
        debug_assert_eq!(
            row.len(),
            self.table.header().len(),
            "row width mismatch for {:?}",
            self.table
        );
        self.writer.write_record(row)?;
        Ok(())
    }

    /// Flushes buffered rows to disk.
    pub fn flush(&mut self) -> CopyResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// The full set of open output tables.
pub struct OutputTables {
    writers: Vec<TableWriter>,
}

impl OutputTables {
    /// Creates the two table directories under `output_dir` and opens every
    /// table.
    pub fn create(output_dir: &Path) -> CopyResult<Self> {
        fs::create_dir(output_dir.join(METADATA_DIR))?;
        fs::create_dir(output_dir.join(DEMODATA_DIR))?;

        let writers = Table::ALL
            .iter()
            .map(|table| TableWriter::create(output_dir, *table))
            .collect::<CopyResult<Vec<_>>>()?;
        tracing::debug!("Opened {} tables in {}", writers.len(), output_dir.display());
        Ok(Self { writers })
    }

    /// Appends one row to a table.
    pub fn write_row(&mut self, table: Table, row: &[String]) -> CopyResult<()> {
        self.writers[table.index()].write_row(row)
    }

    /// Flushes and closes every table.
    pub fn finish(mut self) -> CopyResult<()> {
        for writer in &mut self.writers {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_index() {
        for (i, table) in Table::ALL.iter().enumerate() {
            assert_eq!(table.index(), i);
        }
    }

    #[test]
    fn test_table_paths() {
        assert_eq!(
            Table::TreeNodes.relative_path(),
            Path::new("i2b2metadata").join("i2b2_secure.tsv")
        );
        assert_eq!(
            Table::VisitMappings.relative_path(),
            Path::new("i2b2demodata").join("encounter_mapping.tsv")
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(Table::Patients.header(), &["patient_num", "sex_cd"]);
        assert_eq!(Table::Observations.header().len(), 13);
        assert_eq!(Table::TreeNodes.header().len(), 12);
        assert_eq!(Table::Visits.header()[9], "visit_blob");
    }

    #[test]
    fn test_prepare_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("out");

        prepare_output_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_prepare_rejects_non_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("old.tsv"), "x").unwrap();

        let err = prepare_output_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, CopyError::DestinationConflict { .. }));
    }

    #[test]
    fn test_prepare_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = prepare_output_dir(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_table_writer_refuses_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(DEMODATA_DIR)).unwrap();

        let first = TableWriter::create(tmp.path(), Table::Patients);
        assert!(first.is_ok());
        let second = TableWriter::create(tmp.path(), Table::Patients);
        assert!(matches!(second, Err(CopyError::Io(_))));
    }

    #[test]
    fn test_output_tables_write_headers() {
        let tmp = tempfile::tempdir().unwrap();
        let mut tables = OutputTables::create(tmp.path()).unwrap();
        tables
            .write_row(Table::Patients, &["0".to_string(), "male".to_string()])
            .unwrap();
        tables.finish().unwrap();

        let content =
            fs::read_to_string(tmp.path().join(Table::Patients.relative_path())).unwrap();
        assert_eq!(content, "patient_num\tsex_cd\n0\tmale\n");

        let content =
            fs::read_to_string(tmp.path().join(Table::Relations.relative_path())).unwrap();
        assert_eq!(
            content,
            "left_subject_id\trelation_type_id\tright_subject_id\tbiological\tshare_household\n"
        );
    }
}
