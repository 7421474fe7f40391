//! The evolution loop.

use hn_core::Real;
use hn_network::NetworkModel;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{OptimizerError, OptimizerResult};
use crate::fitness::FitnessModel;
use crate::individual::Individual;

/// Genetic-algorithm hyperparameters.
#[derive(Debug, Clone)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Individuals carried over unchanged each generation.
    pub elitism: usize,
    pub tournament_size: usize,
    pub unit_cost_per_m: Real,
    pub min_pressure_m: Real,
    /// Fixed seed for reproducible runs; None draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elitism: 5,
            tournament_size: 5,
            unit_cost_per_m: 100.0,
            min_pressure_m: 10.0,
            seed: None,
        }
    }
}

/// Population summary of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: Real,
    pub worst_fitness: Real,
    pub mean_fitness: Real,
    pub feasible_count: usize,
}

/// What an optimization run hands back to the caller.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Best individual observed across ALL generations, not just the last.
    pub best: Individual,
    /// Material cost of `best` without penalty.
    pub best_cost: Real,
    /// One entry per generation, generation 0 included.
    pub history: Vec<GenerationStats>,
    /// Improvement of the final generation's best over generation 0's best,
    /// in percent, clamped at zero.
    pub improvement_pct: Real,
}

/// Genetic-algorithm search over discrete commercial diameters.
#[derive(Debug)]
pub struct DiameterOptimizer<'a> {
    model: &'a NetworkModel,
    catalog: Vec<Real>,
    config: GaConfig,
}

impl<'a> DiameterOptimizer<'a> {
    /// `catalog` is the set of manufactured diameters (mm); it is sorted
    /// here, callers may pass it in any order.
    pub fn new(
        model: &'a NetworkModel,
        mut catalog: Vec<Real>,
        config: GaConfig,
    ) -> OptimizerResult<Self> {
        if catalog.is_empty() {
            return Err(OptimizerError::EmptyCatalog);
        }
        if config.elitism >= config.population_size {
            return Err(OptimizerError::ElitismTooLarge {
                elitism: config.elitism,
                population_size: config.population_size,
            });
        }
        catalog.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            model,
            catalog,
            config,
        })
    }

    /// Run the full evolution and return the best assignment found.
    ///
    /// All random draws happen sequentially on one seeded generator;
    /// fitness evaluation is draw-free, so its parallel fan-out cannot
    /// perturb the stream and a fixed seed reproduces the run exactly.
    pub fn optimize(&self) -> OptimizationOutcome {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fitness = FitnessModel::new(
            self.model,
            &self.catalog,
            self.config.unit_cost_per_m,
            self.config.min_pressure_m,
        );
        let genes = self.model.links().len();

        let mut population: Vec<Individual> = (0..self.config.population_size)
            .map(|_| Individual::new((0..genes).map(|_| self.random_gene(&mut rng)).collect()))
            .collect();
        Self::evaluate_all(&fitness, &mut population);
        population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

        let mut best = population[0].clone();
        let mut history = vec![Self::stats(0, &population)];
        debug!(
            population = self.config.population_size,
            generations = self.config.generations,
            genes,
            best_fitness = best.fitness,
            "initial population evaluated"
        );

        for generation in 1..=self.config.generations {
            let mut next: Vec<Individual> = population[..self.config.elitism].to_vec();

            while next.len() < self.config.population_size {
                let parent1 = self.tournament(&population, &mut rng);
                let parent2 = self.tournament(&population, &mut rng);
                let (mut child1, mut child2) = self.crossover(parent1, parent2, &mut rng);
                self.mutate(&mut child1, &mut rng);
                self.mutate(&mut child2, &mut rng);
                next.push(child1);
                next.push(child2);
            }
            next.truncate(self.config.population_size);

            Self::evaluate_all(&fitness, &mut next);
            next.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

            if next[0].fitness < best.fitness {
                best = next[0].clone();
            }
            history.push(Self::stats(generation, &next));
            population = next;

            debug!(
                generation,
                best_fitness = population[0].fitness,
                feasible = history
                    .last()
                    .map(|s| s.feasible_count)
                    .unwrap_or_default(),
                "generation complete"
            );
        }

        let improvement_pct = Self::improvement_pct(&history);
        OptimizationOutcome {
            best_cost: fitness.cost(&best.chromosome),
            best,
            history,
            improvement_pct,
        }
    }

    fn random_gene(&self, rng: &mut StdRng) -> Real {
        self.catalog[rng.gen_range(0..self.catalog.len())]
    }

    /// Tournament selection: sample without replacement, lowest fitness wins.
    fn tournament<'p>(&self, population: &'p [Individual], rng: &mut StdRng) -> &'p Individual {
        let k = self.config.tournament_size.min(population.len()).max(1);
        index::sample(rng, population.len(), k)
            .iter()
            .map(|i| &population[i])
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .expect("tournament sample is non-empty")
    }

    /// Single-point crossover; below the rate (or with a single gene) the
    /// parents pass through unchanged.
    fn crossover(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut StdRng,
    ) -> (Individual, Individual) {
        let genes = parent1.chromosome.len();
        if genes < 2 || !rng.gen_bool(self.config.crossover_rate) {
            return (
                Individual::new(parent1.chromosome.clone()),
                Individual::new(parent2.chromosome.clone()),
            );
        }

        let point = rng.gen_range(1..genes);
        let mut chromosome1 = parent1.chromosome[..point].to_vec();
        chromosome1.extend_from_slice(&parent2.chromosome[point..]);
        let mut chromosome2 = parent2.chromosome[..point].to_vec();
        chromosome2.extend_from_slice(&parent1.chromosome[point..]);

        (Individual::new(chromosome1), Individual::new(chromosome2))
    }

    /// With probability `mutation_rate`, replace one random gene with a new
    /// random catalog value.
    fn mutate(&self, individual: &mut Individual, rng: &mut StdRng) {
        if rng.gen_bool(self.config.mutation_rate) {
            let gene = rng.gen_range(0..individual.chromosome.len());
            individual.chromosome[gene] = self.random_gene(rng);
        }
    }

    /// Per-individual evaluation is embarrassingly parallel and draw-free.
    fn evaluate_all(fitness: &FitnessModel<'_>, population: &mut [Individual]) {
        population
            .par_iter_mut()
            .for_each(|individual| fitness.evaluate(individual));
    }

    fn stats(generation: usize, population: &[Individual]) -> GenerationStats {
        let best_fitness = population.first().map(|i| i.fitness).unwrap_or(0.0);
        let worst_fitness = population.last().map(|i| i.fitness).unwrap_or(0.0);
        let mean_fitness =
            population.iter().map(|i| i.fitness).sum::<Real>() / population.len() as Real;
        GenerationStats {
            generation,
            best_fitness,
            worst_fitness,
            mean_fitness,
            feasible_count: population.iter().filter(|i| i.feasible).count(),
        }
    }

    fn improvement_pct(history: &[GenerationStats]) -> Real {
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return 0.0;
        };
        if history.len() < 2 || first.best_fitness == 0.0 {
            return 0.0;
        }
        ((first.best_fitness - last.best_fitness) / first.best_fitness * 100.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_network::{NetworkBuilder, NodeKind, PipeSpec};

    fn small_model() -> NetworkModel {
        let mut builder = NetworkBuilder::new();
        let r = builder.add_node("R", NodeKind::Reservoir, 0.0, 0.0);
        let a = builder.add_node("A", NodeKind::Junction, 0.0, 2.0);
        let b = builder.add_node("B", NodeKind::Consumption, 0.0, 3.0);
        builder.add_link("RA", r, a, PipeSpec::new(800.0, 20.0));
        builder.add_link("AB", a, b, PipeSpec::new(600.0, 20.0));
        builder.build().unwrap()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let model = small_model();
        let err = DiameterOptimizer::new(&model, vec![], GaConfig::default()).unwrap_err();
        assert!(matches!(err, OptimizerError::EmptyCatalog));
    }

    #[test]
    fn oversized_elitism_is_rejected() {
        let model = small_model();
        let config = GaConfig {
            population_size: 4,
            elitism: 4,
            ..GaConfig::default()
        };
        let err = DiameterOptimizer::new(&model, vec![20.0, 25.0], config).unwrap_err();
        assert!(matches!(err, OptimizerError::ElitismTooLarge { .. }));
    }

    #[test]
    fn catalog_is_sorted_on_construction() {
        let model = small_model();
        let optimizer =
            DiameterOptimizer::new(&model, vec![50.0, 20.0, 32.0], GaConfig::default()).unwrap();
        assert_eq!(optimizer.catalog, vec![20.0, 32.0, 50.0]);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let model = small_model();
        let config = GaConfig {
            population_size: 20,
            generations: 10,
            seed: Some(42),
            unit_cost_per_m: 1.0,
            ..GaConfig::default()
        };
        let catalog = vec![15.0, 20.0, 25.0, 32.0];

        let outcome1 = DiameterOptimizer::new(&model, catalog.clone(), config.clone())
            .unwrap()
            .optimize();
        let outcome2 = DiameterOptimizer::new(&model, catalog, config)
            .unwrap()
            .optimize();

        assert_eq!(outcome1.best.chromosome, outcome2.best.chromosome);
        assert_eq!(outcome1.best.fitness, outcome2.best.fitness);
        assert_eq!(outcome1.history, outcome2.history);
    }

    #[test]
    fn history_covers_every_generation() {
        let model = small_model();
        let config = GaConfig {
            population_size: 12,
            generations: 7,
            elitism: 2,
            seed: Some(1),
            ..GaConfig::default()
        };
        let outcome = DiameterOptimizer::new(&model, vec![20.0, 25.0, 32.0], config)
            .unwrap()
            .optimize();

        assert_eq!(outcome.history.len(), 8); // generation 0 included
        for (i, stats) in outcome.history.iter().enumerate() {
            assert_eq!(stats.generation, i);
            assert!(stats.best_fitness <= stats.worst_fitness);
            assert!(stats.best_fitness <= stats.mean_fitness);
            assert!(stats.mean_fitness <= stats.worst_fitness);
            assert!(stats.feasible_count <= 12);
        }
        assert!(outcome.improvement_pct >= 0.0);
    }

    #[test]
    fn best_never_worsens_across_generations() {
        let model = small_model();
        let config = GaConfig {
            population_size: 16,
            generations: 12,
            elitism: 2,
            seed: Some(9),
            unit_cost_per_m: 1.0,
            ..GaConfig::default()
        };
        let outcome = DiameterOptimizer::new(&model, vec![15.0, 20.0, 25.0, 32.0], config)
            .unwrap()
            .optimize();

        // Elitism makes the per-generation best monotone non-increasing
        for pair in outcome.history.windows(2) {
            assert!(pair[1].best_fitness <= pair[0].best_fitness);
        }
        // The returned best matches the strongest generation
        let floor = outcome
            .history
            .iter()
            .map(|s| s.best_fitness)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.best.fitness, floor);
    }
}
