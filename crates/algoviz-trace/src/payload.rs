//! Result payloads returned by the computation service.
//!
//! Field names follow the service's camelCase JSON. Optional fields the
//! service does not always send are `Option`s; collections default to empty.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mst::MstAlgorithm;
use crate::recursion::recursion_steps;
use crate::step::check_steps;

/// Number of segments assumed when a recursion result carries neither
/// per-segment values nor a segment count.
pub const DEFAULT_SEGMENTS: usize = 5;

/// Identifier the service may send as either a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Label(pub String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Label(s)),
            Value::Number(n) => Ok(Label(n.to_string())),
            other => Err(de::Error::custom(format!(
                "expected string or number identifier, found {other}"
            ))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// Which route metric a recursion result summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMetric {
    Cost,
    Distance,
}

impl RouteMetric {
    /// Name of the recursive function shown in call stacks.
    pub fn function_name(&self) -> &'static str {
        match self {
            RouteMetric::Cost => "calcularCostoTotal",
            RouteMetric::Distance => "calcularDistanciaTotal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteMetric::Cost => "Costo Total",
            RouteMetric::Distance => "Distancia Total",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            RouteMetric::Cost => "unidades monetarias",
            RouteMetric::Distance => "kilómetros",
        }
    }
}

/// Total cost or distance of a route, computed recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursionResult {
    pub costo_total: Option<f64>,
    pub distancia_total: Option<f64>,
    pub numero_tramos: Option<usize>,
    pub metodo: Option<String>,
    pub complejidad: Option<String>,
    pub tiempo_ejecucion_nanosegundos: Option<u64>,
    pub costos_individuales: Option<Vec<f64>>,
    pub distancias_individuales: Option<Vec<f64>>,
}

impl RecursionResult {
    /// The metric this result reports and its total.
    pub fn metric(&self) -> Result<(RouteMetric, f64)> {
        match (self.costo_total, self.distancia_total) {
            (Some(total), _) => Ok((RouteMetric::Cost, total)),
            (None, Some(total)) => Ok((RouteMetric::Distance, total)),
            (None, None) => Err(Error::MissingField("costoTotal")),
        }
    }

    /// Per-segment values to replay.
    ///
    /// Uses the individual values when the service sent them, otherwise
    /// splits the total evenly over `numeroTramos` segments. Fails with
    /// [`Error::TooLarge`] when the replay would exceed the step limit.
    pub fn segments(&self) -> Result<Vec<f64>> {
        let (metric, total) = self.metric()?;
        let individual = match metric {
            RouteMetric::Cost => &self.costos_individuales,
            RouteMetric::Distance => &self.distancias_individuales,
        };
        if let Some(values) = individual {
            check_steps(recursion_steps(values.len() as u64))?;
            return Ok(values.clone());
        }

        let count = self
            .numero_tramos
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SEGMENTS);
        check_steps(recursion_steps(count as u64))?;
        Ok(vec![total / count as f64; count])
    }
}

/// Cost and distance of the same route, combined into cost per kilometer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedMetricsResult {
    pub costo_total: f64,
    pub distancia_total: f64,
    pub costo_por_km: f64,
    pub metodo: Option<String>,
    pub complejidad: Option<String>,
    pub numero_tramos: Option<usize>,
    #[serde(alias = "costosOriginales")]
    pub costos_individuales: Option<Vec<f64>>,
    #[serde(alias = "distanciasOriginales")]
    pub distancias_individuales: Option<Vec<f64>>,
}

impl CombinedMetricsResult {
    /// `(cost, distance)` per segment.
    ///
    /// Uses the per-segment lists when both are present, otherwise splits
    /// both totals evenly over `numeroTramos` segments.
    pub fn segments(&self) -> Result<Vec<(f64, f64)>> {
        if let (Some(costs), Some(distances)) =
            (&self.costos_individuales, &self.distancias_individuales)
        {
            if costs.len() != distances.len() {
                return Err(Error::MismatchedSegments {
                    costs: costs.len(),
                    distances: distances.len(),
                });
            }
            check_steps(costs.len() as u64)?;
            return Ok(costs.iter().copied().zip(distances.iter().copied()).collect());
        }

        let count = self
            .numero_tramos
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SEGMENTS);
        check_steps(count as u64)?;
        let share = (self.costo_total / count as f64, self.distancia_total / count as f64);
        Ok(vec![share; count])
    }
}

/// One timed run inside a performance comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedRun {
    pub costo_total: Option<f64>,
    /// Nanoseconds
    pub tiempo_ejecucion: Option<u64>,
}

/// Recursive against iterative evaluation of the same route total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceComparison {
    #[serde(default)]
    pub recursivo: TimedRun,
    #[serde(default)]
    pub iterativo: TimedRun,
    pub diferencia_tiempo: Option<u64>,
    pub analisis: Option<String>,
}

impl PerformanceComparison {
    pub fn recursive_ns(&self) -> u64 {
        self.recursivo.tiempo_ejecucion.unwrap_or(0)
    }

    pub fn iterative_ns(&self) -> u64 {
        self.iterativo.tiempo_ejecucion.unwrap_or(0)
    }

    /// Absolute gap between the two runs.
    pub fn difference_ns(&self) -> u64 {
        self.recursive_ns().abs_diff(self.iterative_ns())
    }

    /// Whether the iterative run was strictly faster; ties go to recursion.
    pub fn iterative_wins(&self) -> bool {
        self.iterative_ns() < self.recursive_ns()
    }
}

/// A distribution center as listed by sorting and search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    pub id: Option<Label>,
    pub name: Option<String>,
    pub demand_level: Option<f64>,
    pub priority: Option<f64>,
    pub city: Option<String>,
}

impl Center {
    /// Name if present, otherwise the id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.id.as_ref().map(|id| id.0.clone()))
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Value a sort ordered by: demand level, then priority.
    pub fn sort_key(&self) -> Option<f64> {
        self.demand_level.or(self.priority)
    }
}

/// Centers ordered by merge sort or quick sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortResult {
    #[serde(default)]
    pub centros_ordenados: Vec<Center>,
    pub algoritmo: String,
    pub complejidad: String,
    pub tiempo_ejecucion_nanosegundos: Option<u64>,
    pub numero_centros: Option<usize>,
}

/// Binary search over centers ordered by demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinarySearchResult {
    pub encontrado: bool,
    pub centro: Option<Center>,
    pub indice: Option<usize>,
    #[serde(default)]
    pub centros_ordenados: Vec<Center>,
    pub complejidad: Option<String>,
    pub tiempo_ejecucion_nanosegundos: Option<u64>,
}

/// Greedy fuel distribution over container sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelDistributionResult {
    /// Container size (as text) to number of containers used
    pub distribucion: IndexMap<String, u64>,
    pub total_distribuido: u64,
    pub cantidad_bidones_usados: u64,
    pub diferencia: Option<i64>,
    pub algoritmo: Option<String>,
    pub complejidad: Option<String>,
    pub cantidad_requerida: Option<u64>,
    pub tamanos_disponibles: Option<Vec<u64>>,
}

impl FuelDistributionResult {
    /// Amount the allocation aimed for.
    pub fn required(&self) -> u64 {
        self.cantidad_requerida.unwrap_or(self.total_distribuido)
    }

    /// Every container size on offer, falling back to the sizes used.
    pub fn sizes(&self) -> Result<Vec<u64>> {
        match &self.tamanos_disponibles {
            Some(sizes) => Ok(sizes.clone()),
            None => self
                .sorted_distribution()
                .map(|used| used.into_iter().map(|(size, _)| size).collect()),
        }
    }

    /// `(size, quantity)` pairs, largest size first.
    pub fn sorted_distribution(&self) -> Result<Vec<(u64, u64)>> {
        let mut used = self
            .distribucion
            .iter()
            .map(|(size, &quantity)| {
                size.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|&s| s > 0)
                    .map(|s| (s, quantity))
                    .ok_or_else(|| Error::InvalidDenomination(size.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        used.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(used)
    }
}

/// Greedy budget distribution across projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDistributionResult {
    /// Project name to amount assigned, in assignment order
    pub distribucion: IndexMap<String, f64>,
    pub presupuesto_asignado: f64,
    pub presupuesto_restante: f64,
}

/// An edge selected for the minimum spanning tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstEdge {
    pub from: Label,
    pub to: Label,
    pub weight: f64,
    pub from_name: Option<String>,
    pub to_name: Option<String>,
}

impl MstEdge {
    pub fn new(from: &str, to: &str, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
            from_name: None,
            to_name: None,
        }
    }

    pub fn from_display(&self) -> String {
        self.from_name
            .clone()
            .unwrap_or_else(|| format!("Centro {}", self.from))
    }

    pub fn to_display(&self) -> String {
        self.to_name
            .clone()
            .unwrap_or_else(|| format!("Centro {}", self.to))
    }
}

/// Minimum spanning tree computed by Kruskal or Prim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstResult {
    pub mst: Vec<MstEdge>,
    pub costo_total: f64,
    pub numero_aristas: usize,
    pub complejidad: String,
}

/// Single-source shortest distances computed by Dijkstra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortestPathResult {
    pub source: Label,
    /// Vertex to distance; `None` marks an unreachable vertex
    pub distances: IndexMap<String, Option<f64>>,
    pub complejidad: String,
}

impl ShortestPathResult {
    /// Reachable vertices, nearest first; ties break on the vertex label.
    pub fn reachable(&self) -> Vec<(&str, f64)> {
        let mut reached: Vec<(&str, f64)> = self
            .distances
            .iter()
            .filter_map(|(vertex, distance)| distance.map(|d| (vertex.as_str(), d)))
            .collect();
        reached.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        reached
    }
}

/// Per-project figures a knapsack result may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub nombre: String,
    pub costo: f64,
    pub beneficio: f64,
}

/// 0/1 knapsack solved by dynamic programming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnapsackResult {
    pub proyectos_seleccionados: Vec<String>,
    pub beneficio_total: f64,
    pub costo_total: f64,
    pub presupuesto_restante: f64,
    pub algoritmo: String,
    pub complejidad: String,
    /// Catalogue of candidate projects, when the service sends it
    #[serde(default)]
    pub proyectos: Vec<Project>,
    #[serde(rename = "tablaDP")]
    pub tabla_dp: Option<Vec<Vec<f64>>>,
    pub presupuesto_inicial: Option<f64>,
}

impl KnapsackResult {
    /// Catalogue entry for a selected project.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.proyectos.iter().find(|p| p.nombre == name)
    }
}

/// A bare DP table, as sent for table views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpTable {
    #[serde(alias = "tablaDP")]
    pub tabla: Vec<Vec<f64>>,
}

/// Summary of one strategy inside a knapsack comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnapsackSummary {
    #[serde(default)]
    pub proyectos_seleccionados: Vec<String>,
    #[serde(default)]
    pub beneficio_total: f64,
    #[serde(default)]
    pub costo_total: f64,
}

/// Dynamic programming against greedy on the same knapsack instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnapsackComparison {
    pub programacion_dinamica: KnapsackSummary,
    pub greedy: KnapsackSummary,
    pub mejor_estrategia: Option<String>,
    #[serde(default)]
    pub diferencia_beneficio: f64,
}

impl KnapsackComparison {
    /// Winning strategy, derived from the benefit difference when the
    /// service did not name one.
    pub fn best(&self) -> String {
        if let Some(best) = &self.mejor_estrategia {
            return best.clone();
        }
        if self.diferencia_beneficio > 0.0 {
            "DP".to_string()
        } else if self.diferencia_beneficio < 0.0 {
            "Greedy".to_string()
        } else {
            "Empate".to_string()
        }
    }
}

/// Kinds of result the computation service returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultKind {
    Recursion,
    Sorting,
    BinarySearch,
    GreedyFuel,
    GreedyBudget,
    MstKruskal,
    MstPrim,
    ShortestPath,
    Knapsack,
    KnapsackComparison,
    CombinedMetrics,
    PerformanceComparison,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Recursion => "recursion",
            ResultKind::Sorting => "sorting",
            ResultKind::BinarySearch => "binary-search",
            ResultKind::GreedyFuel => "greedy-fuel",
            ResultKind::GreedyBudget => "greedy-budget",
            ResultKind::MstKruskal => "mst-kruskal",
            ResultKind::MstPrim => "mst-prim",
            ResultKind::ShortestPath => "shortest-path",
            ResultKind::Knapsack => "knapsack",
            ResultKind::KnapsackComparison => "knapsack-comparison",
            ResultKind::CombinedMetrics => "combined-metrics",
            ResultKind::PerformanceComparison => "performance-comparison",
        }
    }
}

/// A parsed result payload of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Recursion(RecursionResult),
    Sorting(SortResult),
    BinarySearch(BinarySearchResult),
    GreedyFuel(FuelDistributionResult),
    GreedyBudget(BudgetDistributionResult),
    Mst {
        algorithm: MstAlgorithm,
        result: MstResult,
    },
    ShortestPath(ShortestPathResult),
    Knapsack(KnapsackResult),
    KnapsackComparison(KnapsackComparison),
    CombinedMetrics(CombinedMetricsResult),
    PerformanceComparison(PerformanceComparison),
}

impl ResultPayload {
    /// Parse a JSON payload as the given kind.
    pub fn from_value(kind: ResultKind, value: &Value) -> Result<Self> {
        let family = kind.as_str();
        Ok(match kind {
            ResultKind::Recursion => ResultPayload::Recursion(parse(family, value)?),
            ResultKind::Sorting => ResultPayload::Sorting(parse(family, value)?),
            ResultKind::BinarySearch => ResultPayload::BinarySearch(parse(family, value)?),
            ResultKind::GreedyFuel => ResultPayload::GreedyFuel(parse(family, value)?),
            ResultKind::GreedyBudget => ResultPayload::GreedyBudget(parse(family, value)?),
            ResultKind::MstKruskal => ResultPayload::Mst {
                algorithm: MstAlgorithm::Kruskal,
                result: parse(family, value)?,
            },
            ResultKind::MstPrim => ResultPayload::Mst {
                algorithm: MstAlgorithm::Prim,
                result: parse(family, value)?,
            },
            ResultKind::ShortestPath => ResultPayload::ShortestPath(parse(family, value)?),
            ResultKind::Knapsack => ResultPayload::Knapsack(parse(family, value)?),
            ResultKind::KnapsackComparison => {
                ResultPayload::KnapsackComparison(parse(family, value)?)
            }
            ResultKind::CombinedMetrics => ResultPayload::CombinedMetrics(parse(family, value)?),
            ResultKind::PerformanceComparison => {
                ResultPayload::PerformanceComparison(parse(family, value)?)
            }
        })
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            ResultPayload::Recursion(_) => ResultKind::Recursion,
            ResultPayload::Sorting(_) => ResultKind::Sorting,
            ResultPayload::BinarySearch(_) => ResultKind::BinarySearch,
            ResultPayload::GreedyFuel(_) => ResultKind::GreedyFuel,
            ResultPayload::GreedyBudget(_) => ResultKind::GreedyBudget,
            ResultPayload::Mst {
                algorithm: MstAlgorithm::Kruskal,
                ..
            } => ResultKind::MstKruskal,
            ResultPayload::Mst {
                algorithm: MstAlgorithm::Prim,
                ..
            } => ResultKind::MstPrim,
            ResultPayload::ShortestPath(_) => ResultKind::ShortestPath,
            ResultPayload::Knapsack(_) => ResultKind::Knapsack,
            ResultPayload::KnapsackComparison(_) => ResultKind::KnapsackComparison,
            ResultPayload::CombinedMetrics(_) => ResultKind::CombinedMetrics,
            ResultPayload::PerformanceComparison(_) => ResultKind::PerformanceComparison,
        }
    }
}

/// Deserialize `value` as `T`, tagging failures with the family name.
pub(crate) fn parse<T: DeserializeOwned>(family: &'static str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|source| Error::MalformedPayload { family, source })
}
