use std::io::Read;

use anyhow::{bail, Context};

use crate::models::{
    parse_lenient, AcademicLevel, GradeHistory, SemesterRecord, DEFAULT_SEMESTER_SKS,
};
use crate::target::MAX_GRADE;
use crate::trend::round_to;

/// Clamps an edited IPS into [0, 4] at two decimals, the way the entry
/// form normalizes a field after every change.
pub fn normalize_ips(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    round_to(value.clamp(0.0, MAX_GRADE), 2)
}

fn normalize_sks(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl GradeHistory {
    pub fn new(jenjang: AcademicLevel) -> Self {
        Self {
            jenjang,
            semesters: Vec::new(),
        }
    }

    pub fn semester_count(&self) -> usize {
        self.semesters.len()
    }

    /// Appends a semester and returns its 1-based number.
    pub fn add_semester(&mut self, ips: Option<f64>, sks: Option<f64>) -> usize {
        self.semesters.push(SemesterRecord {
            ips: ips.map(normalize_ips).unwrap_or(0.0),
            sks: sks.map(normalize_sks).unwrap_or(DEFAULT_SEMESTER_SKS),
        });
        self.semesters.len()
    }

    pub fn update_semester(
        &mut self,
        semester: usize,
        ips: Option<f64>,
        sks: Option<f64>,
    ) -> anyhow::Result<()> {
        let index = self.index_of(semester)?;
        let record = &mut self.semesters[index];
        if let Some(ips) = ips {
            record.ips = normalize_ips(ips);
        }
        if let Some(sks) = sks {
            record.sks = normalize_sks(sks);
        }
        Ok(())
    }

    /// Removes a semester; later semesters shift down by one.
    pub fn remove_semester(&mut self, semester: usize) -> anyhow::Result<SemesterRecord> {
        let index = self.index_of(semester)?;
        Ok(self.semesters.remove(index))
    }

    pub fn pop_semester(&mut self) -> Option<SemesterRecord> {
        self.semesters.pop()
    }

    /// Switching level from the entry form starts a fresh history with one
    /// blank semester; `reset = false` keeps the recorded semesters.
    pub fn set_level(&mut self, jenjang: AcademicLevel, reset: bool) {
        self.jenjang = jenjang;
        if reset {
            self.semesters.clear();
            self.add_semester(None, None);
        }
    }

    fn index_of(&self, semester: usize) -> anyhow::Result<usize> {
        if semester == 0 || semester > self.semesters.len() {
            bail!(
                "semester {semester} does not exist (history has {} semesters)",
                self.semesters.len()
            );
        }
        Ok(semester - 1)
    }
}

/// Reads `ips,sks` rows. Unparseable numbers become 0; a blank SKS cell
/// gets the default load of a new semester.
pub fn semesters_from_csv<R: Read>(reader: R) -> anyhow::Result<Vec<SemesterRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        #[serde(default)]
        ips: String,
        #[serde(default)]
        sks: String,
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut semesters = Vec::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV row {}", line + 1))?;
        let sks = if row.sks.is_empty() {
            DEFAULT_SEMESTER_SKS
        } else {
            parse_lenient(&row.sks)
        };
        semesters.push(SemesterRecord {
            ips: normalize_ips(parse_lenient(&row.ips)),
            sks,
        });
    }

    Ok(semesters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GradeHistory {
        GradeHistory {
            jenjang: AcademicLevel::S1,
            semesters: vec![
                SemesterRecord::new(3.1, 20.0),
                SemesterRecord::new(3.3, 21.0),
                SemesterRecord::new(3.5, 22.0),
            ],
        }
    }

    #[test]
    fn new_semester_defaults_to_three_credits() {
        let mut history = GradeHistory::new(AcademicLevel::D3);
        let number = history.add_semester(None, None);

        assert_eq!(number, 1);
        assert_eq!(history.semesters[0], SemesterRecord::new(0.0, 3.0));
    }

    #[test]
    fn edits_clamp_and_round_ips() {
        let mut history = sample();
        history.update_semester(2, Some(4.7), None).unwrap();
        assert_eq!(history.semesters[1], SemesterRecord::new(4.0, 21.0));

        history.update_semester(1, Some(3.456), Some(18.0)).unwrap();
        assert_eq!(history.semesters[0], SemesterRecord::new(3.46, 18.0));

        history.update_semester(3, Some(-1.0), None).unwrap();
        assert_eq!(history.semesters[2].ips, 0.0);
    }

    #[test]
    fn removing_reindexes_later_semesters() {
        let mut history = sample();
        let removed = history.remove_semester(2).unwrap();

        assert_eq!(removed, SemesterRecord::new(3.3, 21.0));
        assert_eq!(history.semester_count(), 2);
        assert_eq!(history.semesters[1], SemesterRecord::new(3.5, 22.0));
    }

    #[test]
    fn out_of_range_semesters_are_rejected() {
        let mut history = sample();
        assert!(history.remove_semester(0).is_err());
        assert!(history.update_semester(4, Some(3.0), None).is_err());
        assert_eq!(history.semester_count(), 3);
    }

    #[test]
    fn pop_removes_last_semester() {
        let mut history = sample();
        assert_eq!(history.pop_semester(), Some(SemesterRecord::new(3.5, 22.0)));
        assert_eq!(history.semester_count(), 2);

        let mut empty = GradeHistory::default();
        assert_eq!(empty.pop_semester(), None);
    }

    #[test]
    fn level_change_can_reset_history() {
        let mut history = sample();
        history.set_level(AcademicLevel::S2, false);
        assert_eq!(history.semester_count(), 3);

        history.set_level(AcademicLevel::S3, true);
        assert_eq!(history.jenjang, AcademicLevel::S3);
        assert_eq!(history.semesters, vec![SemesterRecord::new(0.0, 3.0)]);
    }

    #[test]
    fn reads_lenient_csv() {
        let data = "ips,sks\n3.25,20\nabc,18\n4.8,\n 3.5 , 21x\n";
        let semesters = semesters_from_csv(data.as_bytes()).unwrap();

        assert_eq!(
            semesters,
            vec![
                SemesterRecord::new(3.25, 20.0),
                SemesterRecord::new(0.0, 18.0),
                SemesterRecord::new(4.0, 3.0),
                SemesterRecord::new(3.5, 21.0),
            ]
        );
    }
}
