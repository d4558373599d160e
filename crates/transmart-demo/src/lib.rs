//! # transmart-demo
//!
//! A small sample data collection: two patients with an age, a diagnosis and
//! a diagnosis date each, under a single study and trial visit.
//!
//! ```text
//! Ontology
//! ├ Age
//! ├ Diagnosis
//! └ Diagnosis date
//! ```

#![warn(missing_docs)]

use std::error::Error;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use transmart_types::{
    Concept, DataCollection, Observation, Patient, Study, Timepoint, TrialVisit, Value, ValueType,
    Visit,
};

/// Result type of the demo.
pub type DemoResult<T> = Result<T, Box<dyn Error>>;

fn date(year: i32, month: u32, day: u32) -> DemoResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("invalid date {}-{}-{}", year, month, day).into())
}

fn datetime(
    (year, month, day): (i32, u32, u32),
    (hour, minute, second): (u32, u32, u32),
    micro: u32,
) -> DemoResult<Timepoint> {
    let naive = date(year, month, day)?
        .and_hms_micro_opt(hour, minute, second, micro)
        .ok_or_else(|| format!("invalid time {}:{}:{}", hour, minute, second))?;
    Ok(Utc.from_utc_datetime(&naive).into())
}

/// Builds the sample collection, tagging the ontology root with the given
/// upload date.
pub fn sample_collection(upload_date: NaiveDate) -> DemoResult<DataCollection> {
    let age = Arc::new(Concept::new("test:age", "Age", "\\Test\\age", ValueType::Numeric));
    let diagnosis = Arc::new(Concept::new(
        "test:diagnosis",
        "Diagnosis",
        "\\Test\\diagnosis",
        ValueType::Categorical,
    ));
    let diagnosis_date = Arc::new(Concept::new(
        "test:diagnosis_date",
        "Diagnosis date",
        "\\Test\\diagnosis_date",
        ValueType::Date,
    ));
    let study = Arc::new(Study::new("test", "Test study"));
    let week_1 = Arc::new(TrialVisit::new(study.clone(), "Week 1").with_rel_time("Week", 1));
    let subj0 = Arc::new(Patient::new("SUBJ0", "male"));
    let subj1 = Arc::new(Patient::new("SUBJ1", "female"));
    let visit1 = Arc::new(Visit::new(subj0.clone(), "visit1"));
    let visit2 = Arc::new(Visit::new(subj1.clone(), "visit2"));

    let observation = |patient: &Arc<Patient>,
                       concept: &Arc<Concept>,
                       visit: &Arc<Visit>,
                       value: Value,
                       start: Timepoint,
                       end: Option<Timepoint>| {
        Observation::new(patient.clone(), concept.clone(), week_1.clone(), value)
            .with_visit(visit.clone())
            .with_period(Some(start), end)
    };

    let observations = vec![
        observation(
            &subj0,
            &age,
            &visit1,
            Value::numeric(28.0),
            date(2019, 3, 28)?.into(),
            None,
        ),
        observation(
            &subj0,
            &diagnosis,
            &visit1,
            Value::categorical("Influenza"),
            datetime((2019, 6, 26), (12, 34, 0), 0)?,
            Some(datetime((2019, 6, 28), (16, 46, 13), 345)?),
        ),
        observation(
            &subj0,
            &diagnosis_date,
            &visit1,
            Value::Date(Some(datetime((2018, 4, 30), (17, 10, 0), 0)?)),
            datetime((2019, 6, 26), (13, 50, 10), 0)?,
            None,
        ),
        observation(
            &subj1,
            &age,
            &visit2,
            Value::numeric(43.0),
            date(2019, 3, 28)?.into(),
            None,
        ),
        observation(
            &subj1,
            &diagnosis,
            &visit2,
            Value::categorical("Malaria"),
            datetime((2019, 8, 12), (10, 30, 0), 0)?,
            None,
        ),
        observation(
            &subj1,
            &diagnosis_date,
            &visit2,
            Value::Date(Some(datetime((2018, 10, 7), (13, 20, 0), 0)?)),
            datetime((2019, 8, 12), (10, 30, 0), 0)?,
            None,
        ),
    ];

    let mut collection = DataCollection::new();
    let top = collection.ontology.add_folder("Ontology");
    collection
        .ontology
        .add_tag(top, "Upload date", upload_date.format("%Y-%m-%d").to_string());
    for concept in [&age, &diagnosis, &diagnosis_date] {
        let node = collection.ontology.add_concept_node(concept.clone());
        collection.ontology.add_child(top, node);
    }
    collection.ontology.add_root(top);

    collection.concepts = vec![age, diagnosis, diagnosis_date];
    collection.studies = vec![study];
    collection.trial_visits = vec![week_1];
    collection.patients = vec![subj0, subj1];
    collection.visits = vec![visit1, visit2];
    collection.observations = observations;
    Ok(collection)
}
