//! Integration tests for the diameter optimizer.

use hn_network::{NetworkBuilder, NetworkModel, NodeKind, PipeSpec};
use hn_optimizer::{DiameterAction, DiameterOptimizer, GaConfig, recommendations};

/// One long, undersized feeder pipe: in the fitness model's pressure
/// estimate only the largest catalog entry keeps the consumption node above
/// the minimum.
fn feeder_model() -> NetworkModel {
    let mut builder = NetworkBuilder::new();
    let r = builder.add_node("R", NodeKind::Reservoir, 0.0, 0.0);
    let j = builder.add_node("J", NodeKind::Consumption, 0.0, 5.0);
    builder.add_link("RJ", r, j, PipeSpec::new(2000.0, 10.0));
    builder.build().unwrap()
}

#[test]
fn single_link_converges_to_the_only_feasible_diameter() {
    let model = feeder_model();
    // 2000 m of pipe: 10 and 15 mm starve the node in the estimate, 20 mm
    // holds the minimum pressure.
    let catalog = vec![10.0, 15.0, 20.0];
    let config = GaConfig {
        population_size: 50,
        generations: 40,
        elitism: 4,
        unit_cost_per_m: 1.0,
        min_pressure_m: 10.0,
        seed: Some(7),
        ..GaConfig::default()
    };

    let outcome = DiameterOptimizer::new(&model, catalog, config)
        .unwrap()
        .optimize();

    assert_eq!(outcome.best.chromosome, vec![20.0]);
    assert!(outcome.best.feasible);
    assert!(outcome.best_cost > 0.0);
    assert!(outcome.best_cost <= outcome.best.fitness);
    assert_eq!(outcome.history.len(), 41);

    // The winning assignment upsizes the existing 10 mm pipe
    let recs = recommendations(&model, &outcome.best);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].action, DiameterAction::Increase);
    assert_eq!(recs[0].proposed_diameter_mm, 20.0);
}

#[test]
fn feasible_solutions_dominate_infeasible_cost_savings() {
    let model = feeder_model();
    let catalog = vec![10.0, 15.0, 20.0];
    let config = GaConfig {
        population_size: 40,
        generations: 25,
        unit_cost_per_m: 1.0,
        seed: Some(3),
        ..GaConfig::default()
    };

    let outcome = DiameterOptimizer::new(&model, catalog, config)
        .unwrap()
        .optimize();

    // The deficit penalty dwarfs the material savings of an undersized pipe
    assert!(outcome.best.feasible);
    let last = outcome.history.last().unwrap();
    assert!(last.feasible_count > 0);
}

#[test]
fn improvement_is_measured_against_generation_zero() {
    let model = feeder_model();
    let catalog = vec![10.0, 15.0, 20.0];
    let config = GaConfig {
        population_size: 30,
        generations: 20,
        unit_cost_per_m: 1.0,
        seed: Some(11),
        ..GaConfig::default()
    };

    let outcome = DiameterOptimizer::new(&model, catalog, config)
        .unwrap()
        .optimize();

    let first = outcome.history.first().unwrap().best_fitness;
    let last = outcome.history.last().unwrap().best_fitness;
    let expected = ((first - last) / first * 100.0).max(0.0);
    assert!((outcome.improvement_pct - expected).abs() < 1e-12);
}
