//! Run orchestration: editor graph in, probabilities out.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qarch_builder::{BuildOutput, BuildWarning, CircuitBuilder, EditorGraph};
use qarch_ir::CircuitModel;

use crate::config::Config;
use crate::error::SimulationError;
use crate::statevector::Statevector;

/// Cooperative cancellation flag, checked between gate applications.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not yet cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-run options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Draw this many samples into [`SimulationResult::counts`].
    pub shots: Option<u32>,
    /// Seed for sampling.
    pub seed: u64,
    /// Cancellation flag.
    pub cancel: Option<CancellationToken>,
}

impl RunOptions {
    /// Request a shot histogram.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Probabilities are available.
    Completed,
    /// The editor graph could not be built into a circuit.
    InvalidInput,
    /// The engine could not execute the circuit.
    EngineFailure,
    /// Cancelled between gates.
    Cancelled,
}

impl RunStatus {
    /// The serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::InvalidInput => "invalid_input",
            RunStatus::EngineFailure => "engine_failure",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of one basis state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Basis label, qubit 0 rightmost.
    pub bitstring: String,
    /// |amplitude|².
    pub probability: f64,
}

/// Successful simulation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Register size.
    pub num_qubits: u32,
    /// One entry per basis state, in index order.
    pub probabilities: Vec<MeasurementOutcome>,
    /// Builder warnings.
    pub warnings: Vec<BuildWarning>,
    /// The executed operations, one line each.
    pub readout: Vec<String>,
    /// Shot histogram, when shots were requested.
    pub counts: Option<BTreeMap<String, u32>>,
    /// Always [`RunStatus::Completed`].
    pub status: RunStatus,
    /// Wall time of the run.
    pub elapsed_ms: u64,
}

impl SimulationResult {
    /// Probabilities as a plain vector in index order.
    pub fn probability_vector(&self) -> Vec<f64> {
        self.probabilities.iter().map(|o| o.probability).collect()
    }

    /// Probability of the basis state labelled `bitstring`.
    pub fn probability(&self, bitstring: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|o| o.bitstring == bitstring)
            .map(|o| o.probability)
    }

    /// The most probable outcome; the lowest index wins ties.
    pub fn most_likely(&self) -> Option<&MeasurementOutcome> {
        self.probabilities
            .iter()
            .reduce(|best, o| if o.probability > best.probability { o } else { best })
    }
}

/// Editor-facing view of a run, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// How the run ended.
    pub status: RunStatus,
    /// Register size, when a circuit was built.
    pub num_qubits: Option<u32>,
    /// Empty unless the run completed.
    pub probabilities: Vec<MeasurementOutcome>,
    /// Builder warnings.
    pub warnings: Vec<BuildWarning>,
    /// The built operations, one line each.
    pub readout: Vec<String>,
    /// Shot histogram.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<BTreeMap<String, u32>>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    fn failure(err: &SimulationError, built: Option<&BuildOutput>) -> Self {
        Self {
            status: err.status(),
            num_qubits: built.map(|b| b.circuit.num_qubits()),
            probabilities: Vec::new(),
            warnings: built.map(|b| b.warnings.clone()).unwrap_or_default(),
            readout: built.map(BuildOutput::readout).unwrap_or_default(),
            counts: None,
            error: Some(err.to_string()),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<SimulationResult> for RunReport {
    fn from(result: SimulationResult) -> Self {
        Self {
            status: result.status,
            num_qubits: Some(result.num_qubits),
            probabilities: result.probabilities,
            warnings: result.warnings,
            readout: result.readout,
            counts: result.counts,
            error: None,
        }
    }
}

/// Runs editor graphs through the builder and a fresh state-vector engine.
///
/// The service holds configuration only; every run allocates its own state.
#[derive(Debug, Clone, Default)]
pub struct SimulationService {
    config: Config,
    builder: CircuitBuilder,
}

impl SimulationService {
    /// Create a service with the given configuration.
    pub fn new(config: Config) -> Self {
        let builder = CircuitBuilder::new(config.builder.clone());
        Self { config, builder }
    }

    /// Build without simulating.
    pub fn build(&self, graph: &EditorGraph) -> Result<BuildOutput, SimulationError> {
        Ok(self.builder.build(graph)?)
    }

    /// Build `graph` and simulate it from |0...0⟩.
    #[instrument(skip(self, graph, options), fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
    pub fn run(
        &self,
        graph: &EditorGraph,
        options: &RunOptions,
    ) -> Result<SimulationResult, SimulationError> {
        let start = Instant::now();
        let output = self.builder.build(graph)?;
        self.finish(output, options, start)
    }

    /// Like [`run`](Self::run), but never fails: errors are folded into the report.
    pub fn execute(&self, graph: &EditorGraph, options: &RunOptions) -> RunReport {
        let start = Instant::now();
        let output = match self.builder.build(graph) {
            Ok(output) => output,
            Err(err) => return RunReport::failure(&SimulationError::from(err), None),
        };
        let built = output.clone();
        match self.finish(output, options, start) {
            Ok(result) => result.into(),
            Err(err) => RunReport::failure(&err, Some(&built)),
        }
    }

    /// Run on tokio's blocking pool so the caller's executor stays free.
    pub async fn run_detached(
        &self,
        graph: EditorGraph,
        options: RunOptions,
    ) -> Result<SimulationResult, SimulationError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.run(&graph, &options))
            .await
            .map_err(|e| SimulationError::Dispatch(e.to_string()))?
    }

    /// Apply every operation of `circuit` to a fresh state.
    pub fn simulate(
        &self,
        circuit: &CircuitModel,
        options: &RunOptions,
    ) -> Result<Statevector, SimulationError> {
        let mut state = Statevector::new(circuit.num_qubits(), &self.config.simulator)?;
        let total = circuit.len();
        for (applied, op) in circuit.operations().iter().enumerate() {
            if options.is_cancelled() {
                debug!("Cancelled after {} of {} operations", applied, total);
                return Err(SimulationError::Cancelled { applied, total });
            }
            state.apply_operation(op)?;
        }
        Ok(state)
    }

    fn finish(
        &self,
        output: BuildOutput,
        options: &RunOptions,
        start: Instant,
    ) -> Result<SimulationResult, SimulationError> {
        debug!(
            "Simulating {} operations on {} qubits",
            output.circuit.len(),
            output.circuit.num_qubits()
        );
        let state = self.simulate(&output.circuit, options)?;

        let probabilities = state
            .probabilities()
            .into_iter()
            .enumerate()
            .map(|(i, probability)| MeasurementOutcome {
                bitstring: state.outcome_to_bitstring(i),
                probability,
            })
            .collect();
        let counts = options
            .shots
            .map(|shots| state.sample_counts(shots, options.seed));

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        Ok(SimulationResult {
            num_qubits: state.num_qubits(),
            probabilities,
            readout: output.readout(),
            warnings: output.warnings,
            counts,
            status: RunStatus::Completed,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use qarch_builder::{BuilderConfig, EditorNode};

    use crate::config::SimConfig;
    use crate::error::EngineError;

    fn bell_graph() -> EditorGraph {
        EditorGraph::new()
            .node(EditorNode::new("q0", "input", 0.0, 0.0))
            .node(EditorNode::new("q1", "input", 0.0, 100.0))
            .node(EditorNode::new("h", "gate", 100.0, 0.0).with_label("H"))
            .node(EditorNode::new("cx", "gate", 200.0, 50.0).with_label("CNOT"))
            .edge("q0", "h")
            .edge("h", "cx")
            .edge("q1", "cx")
    }

    #[test]
    fn test_bell_run() {
        let service = SimulationService::default();
        let result = service.run(&bell_graph(), &RunOptions::default()).unwrap();
        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.readout, vec!["H on q0", "CX on q0, q1"]);
        let probs = result.probability_vector();
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[3] - 0.5).abs() < 1e-6);
        assert_eq!(result.probabilities[3].bitstring, "11");
        assert!(result.counts.is_none());
    }

    #[test]
    fn test_counts_follow_seed() {
        let service = SimulationService::default();
        let options = RunOptions::default().with_shots(200).with_seed(9);
        let a = service.run(&bell_graph(), &options).unwrap();
        let b = service.run(&bell_graph(), &options).unwrap();
        assert_eq!(a.counts, b.counts);
        let counts = a.counts.unwrap();
        assert_eq!(counts.values().sum::<u32>(), 200);
        assert!(counts.keys().all(|k| k == "00" || k == "11"));
    }

    #[test]
    fn test_capacity_reported_as_engine_failure() {
        let config = Config {
            simulator: SimConfig::default().with_max_qubits(1),
            builder: BuilderConfig::default(),
        };
        let service = SimulationService::new(config);
        let err = service
            .run(&bell_graph(), &RunOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Engine(EngineError::CapacityExceeded {
                requested: 2,
                max: 1
            })
        ));

        let report = service.execute(&bell_graph(), &RunOptions::default());
        assert_eq!(report.status, RunStatus::EngineFailure);
        assert!(report.probabilities.is_empty());
        assert_eq!(report.readout.len(), 2);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_cancelled_before_first_gate() {
        let token = CancellationToken::new();
        token.cancel();
        let options = RunOptions::default().with_cancel(token);
        let err = SimulationService::default()
            .run(&bell_graph(), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Cancelled {
                applied: 0,
                total: 2
            }
        ));
        assert_eq!(err.status(), RunStatus::Cancelled);
    }

    #[test]
    fn test_most_likely() {
        let graph = EditorGraph::new()
            .node(EditorNode::new("q0", "input", 0.0, 0.0))
            .node(EditorNode::new("x", "X", 100.0, 0.0))
            .edge("q0", "x");
        let result = SimulationService::default()
            .run(&graph, &RunOptions::default())
            .unwrap();
        assert_eq!(result.most_likely().unwrap().bitstring, "1");
        assert_eq!(result.probability("0"), Some(0.0));
    }
}
