//! Integration tests for cutplan-cli.

use cutplan_cli::report::write_plan_csv;
use cutplan_cli::{Job, RunReport, SyntheticGenerator};
use cutplan_core::export::{DETAIL_HEADERS, SUMMARY_HEADERS};
use cutplan_engine::PlanEngine;

const KITCHEN_JOB: &str = r#"{
    "sheet_sizes": [[2000, 1000]],
    "config": { "time_limit_ms": 60000 },
    "parts": [
        { "ref": "SIDE", "name": "Cabinet side", "material": "MDF", "thickness": 18, "width": 720, "height": 560, "quantity": 4 },
        { "ref": "SHELF", "material": "MDF", "thickness": 18, "width": 564, "height": 500, "quantity": 3 },
        { "ref": "BACK", "material": "HDF", "thickness": 3, "width": 720, "height": 600, "quantity": 2 }
    ]
}"#;

mod job_tests {
    use super::*;

    #[test]
    fn test_job_file_end_to_end() {
        let job = Job::from_json(KITCHEN_JOB).unwrap();
        let parts = job.part_list().unwrap();
        assert_eq!(parts.total_quantity(), 9);

        let plan = PlanEngine::new(job.plan_config())
            .calculate(parts.as_slice(), None)
            .unwrap();
        assert_eq!(plan.total_parts, 9);
        assert!(plan
            .sheets
            .iter()
            .all(|s| s.size.width == 2000.0 && s.size.height == 1000.0));

        let hdf: Vec<_> = plan.sheets.iter().filter(|s| s.material == "HDF").collect();
        assert!(!hdf.is_empty());
        assert!(hdf.iter().all(|s| s.placements().iter().all(|p| p.reference == "BACK")));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let job = Job::from_json(KITCHEN_JOB).unwrap();
        let parts = job.part_list().unwrap();
        let plan = PlanEngine::new(job.plan_config())
            .calculate(parts.as_slice(), None)
            .unwrap();

        let report = RunReport::new(&plan);
        let mut buf = Vec::new();
        report.write_json(&mut buf).unwrap();

        let parsed: RunReport = serde_json::from_slice(&buf).unwrap();
        let restored = parsed.to_plan().unwrap();
        assert_eq!(restored.sheet_count(), plan.sheet_count());
        assert_eq!(restored.total_parts, plan.total_parts);
        assert_eq!(parsed.detail_rows.len(), 9);
    }

    #[test]
    fn test_csv_has_both_tables() {
        let job = Job::from_json(KITCHEN_JOB).unwrap();
        let parts = job.part_list().unwrap();
        let plan = PlanEngine::new(job.plan_config())
            .calculate(parts.as_slice(), None)
            .unwrap();

        let mut buf = Vec::new();
        write_plan_csv(&mut buf, &plan).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let (summary, detail) = text.split_once("\n\n").unwrap();

        assert_eq!(summary.lines().next().unwrap(), SUMMARY_HEADERS.join(","));
        assert_eq!(summary.lines().count(), plan.sheet_count() + 1);
        assert_eq!(detail.lines().next().unwrap(), DETAIL_HEADERS.join(","));
        assert_eq!(detail.lines().count(), 9 + 1);
    }
}

mod synthetic_tests {
    use super::*;

    #[test]
    fn test_generated_jobs_are_packable() {
        for seed in [1, 2] {
            let job = SyntheticGenerator::with_seed(seed).mixed(15, 3);
            let parts = job.part_list().unwrap();
            let plan = PlanEngine::new(job.plan_config())
                .calculate(parts.as_slice(), None)
                .unwrap();
            assert_eq!(plan.total_parts, parts.total_quantity());
            for sheet in &plan.sheets {
                sheet.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_generated_job_survives_save_and_load() {
        let job = SyntheticGenerator::with_seed(5).mixed(10, 2);
        let path = std::env::temp_dir().join(format!("cutplan-job-{}.json", std::process::id()));
        job.save(&path).unwrap();
        let loaded = Job::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, job);
    }
}
