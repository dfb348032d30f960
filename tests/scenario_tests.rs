use agile_montecarlo::file::{read_trial_export, write_trial_export, EXPORT_COLUMNS};
use agile_montecarlo::{
    Configuration, ExecutionMode, ProjectInputs, SimulationRunner, TrialColumn,
};
use approx::assert_relative_eq;

fn no_risk_inputs() -> ProjectInputs {
    ProjectInputs {
        base_scope: 500.0,
        developer_rate: 400.0,
        developer_count: 2,
        qa_rate: 350.0,
        qa_count: 2,
        pm_rate: 500.0,
        pm_count: 1,
        risk_scope_pct: 0.0,
        risk_velocity_pct: 0.0,
        risk_bugs_pct: 0.0,
        risk_changes_pct: 0.0,
        cloud_enabled: false,
        managed_service_enabled: false,
        trials: 1_000,
        ..ProjectInputs::default()
    }
}

#[test]
fn no_risk_project_is_deterministic_apart_from_baseline_rework() {
    let result = SimulationRunner::from_inputs(&no_risk_inputs())
        .unwrap()
        .run()
        .unwrap();

    for record in result.trials() {
        assert_eq!(record.final_scope, 500.0);
        assert_eq!(record.velocity, 20.0);
        assert_eq!(record.sprints, 25.0);
        assert_eq!(record.total_days, 250.0);
        assert_eq!(record.duration_months, 12.5);
        assert_eq!(record.labor_cost, 500_000.0);
        assert_eq!(record.cloud_cost, 0.0);
        assert_eq!(record.managed_service_annual, 0.0);
        assert_eq!(record.tco_total, record.tco_one_off);
        assert!((0.0..=500_000.0).contains(&record.rework_cost));
    }

    // Beta(3, 8) rework persists at zero configured bug risk
    let mean_rework = result.trials().column(TrialColumn::ReworkCost).iter().sum::<f64>()
        / result.trials().len() as f64;
    assert_relative_eq!(mean_rework, 500_000.0 * 3.0 / 11.0, max_relative = 0.05);

    let summary = result.summary();
    assert_eq!(summary.duration_months.median, 12.5);
    assert_eq!(summary.duration_months.p90, 12.5);
    // revenue is 1.2x the one-off cost and nothing is amortized
    assert_eq!(summary.probability_of_profit, 1.0);
}

#[test]
fn cloud_and_managed_service_raise_total_cost() {
    let inputs = ProjectInputs {
        cloud_enabled: true,
        cloud_min_monthly: 1_000.0,
        cloud_max_monthly: 5_000.0,
        managed_service_enabled: true,
        managed_service_pct: 15.0,
        trials: 2_000,
        ..ProjectInputs::default()
    };
    let result = SimulationRunner::from_inputs(&inputs).unwrap().run().unwrap();

    for record in result.trials() {
        assert!(record.cloud_cost >= 1_000.0 * record.duration_months);
        assert!(record.cloud_cost <= 5_000.0 * record.duration_months);
        if record.managed_service_annual > 0.0 && record.duration_months > 0.0 {
            assert!(record.tco_total > record.tco_one_off);
        }
    }
}

#[test]
fn export_round_trips_every_column() {
    let inputs = ProjectInputs { trials: 1_000, seed: 2024, ..ProjectInputs::default() };
    let result = SimulationRunner::from_inputs(&inputs).unwrap().run().unwrap();

    let mut buffer = Vec::new();
    write_trial_export(result.trials(), &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with(&EXPORT_COLUMNS.join(",")));

    let rows = read_trial_export(text.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1_000);
    for (row, record) in rows.iter().zip(result.trials()) {
        let tolerance = |v: f64| 0.005 + 1e-9 * v.abs();
        assert!((row.duration_months - record.duration_months).abs() <= tolerance(record.duration_months));
        assert!((row.tco_one_off - record.tco_one_off).abs() <= tolerance(record.tco_one_off));
        assert!((row.managed_service_annual - record.managed_service_annual).abs()
            <= tolerance(record.managed_service_annual));
        assert!((row.tco_total - record.tco_total).abs() <= tolerance(record.tco_total));
        assert!((row.profit - record.profit).abs() <= tolerance(record.profit));
        assert!((row.profit_margin - record.profit_margin).abs() <= tolerance(record.profit_margin));
        assert!((row.scope - record.final_scope).abs() <= tolerance(record.final_scope));
        assert!((row.sprints - record.sprints).abs() <= tolerance(record.sprints));
    }
}

#[test]
fn identical_inputs_reproduce_identical_tables() {
    let inputs = ProjectInputs { trials: 3_000, seed: 99, ..ProjectInputs::default() };
    let config = Configuration::from_inputs(&inputs).unwrap();

    let first = SimulationRunner::new(config.clone()).unwrap()
        .with_mode(ExecutionMode::Parallel)
        .run()
        .unwrap();
    let second = SimulationRunner::new(config.clone()).unwrap()
        .with_mode(ExecutionMode::Parallel)
        .run()
        .unwrap();
    let sequential = SimulationRunner::new(config).unwrap()
        .with_mode(ExecutionMode::Sequential)
        .run()
        .unwrap();

    assert_eq!(first.trials(), second.trials());
    assert_eq!(first.trials(), sequential.trials());
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.summary(), second.summary());
}

#[test]
fn default_project_summary_is_consistent() {
    let result = SimulationRunner::from_inputs(&ProjectInputs::default())
        .unwrap()
        .run()
        .unwrap();
    let summary = result.summary();

    assert_eq!(summary.trial_count, 5_000);
    assert!((0.0..=1.0).contains(&summary.probability_of_profit));
    assert!(summary.duration_months.p90 >= summary.duration_months.median);
    assert!(summary.duration_months.median >= 0.0);
    assert!(summary.tco_total.p90 >= summary.tco_total.p80);
    assert!(summary.tco_total.p80 >= summary.tco_total.median);

    // risk levels are fixed for a single run, so only model outputs are ranked
    assert!(summary.highest_impact_risks.is_empty());
    assert!(summary.sensitivity.iter().all(|e| e.driver.risk_driver().is_none()));
    assert!(summary.sensitivity.iter().any(|e| e.driver == TrialColumn::DurationMonths));
}
