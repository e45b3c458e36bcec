//! "How did it get there" explanations for result payloads.
//!
//! Each explanation has a headline value, a few stat cards, the steps that
//! led to the result and some closing notes. Text is Spanish, matching the
//! messages the trace generators author.

use std::fmt::Write as _;

use algoviz_trace::format::execution_time;
use algoviz_trace::{
    BinarySearchResult, BudgetDistributionResult, Center, CombinedMetricsResult,
    FuelDistributionResult, KnapsackComparison, KnapsackResult, MstAlgorithm, MstResult,
    PerformanceComparison, RecursionResult, ResultKind, ResultPayload, ShortestPathResult,
    SortResult, MAX_STEPS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagram::escape;
use crate::error::Result;

/// The single value an explanation leads with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub value: String,
    pub label: String,
}

/// A labelled figure shown next to the headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

/// One numbered line of the step-by-step walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationStep {
    pub title: String,
    pub detail: String,
    pub result: Option<String>,
}

/// A formatted explanation of one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub title: String,
    pub headline: Headline,
    pub stats: Vec<Stat>,
    pub steps: Vec<ExplanationStep>,
    pub notes: Vec<String>,
}

impl Explanation {
    fn new(title: impl Into<String>, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headline: Headline {
                value: value.into(),
                label: label.into(),
            },
            stats: Vec::new(),
            steps: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn stat(mut self, label: &str, value: impl Into<String>) -> Self {
        self.stats.push(Stat {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    fn step(&mut self, title: String, detail: impl Into<String>, result: Option<String>) {
        self.steps.push(ExplanationStep {
            title,
            detail: detail.into(),
            result,
        });
    }

    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Look up a stat value by label.
    pub fn stat_value(&self, label: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.value.as_str())
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="explanation">"#);
        let _ = write!(
            html,
            r#"<h3 class="explanation-title">{}</h3><div class="modal-highlight-box"><div class="modal-highlight-value">{}</div><div class="modal-highlight-label">{}</div></div>"#,
            escape(&self.title),
            escape(&self.headline.value),
            escape(&self.headline.label)
        );

        html.push_str(r#"<div class="modal-stats-grid">"#);
        for stat in &self.stats {
            let _ = write!(
                html,
                r#"<div class="modal-stat-card"><div class="modal-stat-label">{}</div><div class="modal-stat-value">{}</div></div>"#,
                escape(&stat.label),
                escape(&stat.value)
            );
        }
        html.push_str("</div>");

        if !self.steps.is_empty() {
            html.push_str(r#"<div class="modal-steps-section">"#);
            for (i, step) in self.steps.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<div class="modal-step"><div class="modal-step-number">{}</div><div class="modal-step-content"><div class="modal-step-title">{}</div><div class="modal-step-description">{}</div>"#,
                    i + 1,
                    escape(&step.title),
                    escape(&step.detail)
                );
                if let Some(result) = &step.result {
                    let _ = write!(html, r#"<div class="modal-step-result">{}</div>"#, escape(result));
                }
                html.push_str("</div></div>");
            }
            html.push_str("</div>");
        }

        if !self.notes.is_empty() {
            html.push_str(r#"<div class="modal-explanation">"#);
            for note in &self.notes {
                let _ = write!(html, "<p>{}</p>", escape(note));
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        html
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}\n{}: {}\n",
            self.title, self.headline.label, self.headline.value
        );
        for stat in &self.stats {
            let _ = writeln!(out, "- {}: {}", stat.label, stat.value);
        }
        for (i, step) in self.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {} | {}", i + 1, step.title, step.detail);
            if let Some(result) = &step.result {
                let _ = writeln!(out, "   {result}");
            }
        }
        for note in &self.notes {
            let _ = writeln!(out, "{note}");
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Parse a raw payload of the given kind and explain it.
pub fn explain_value(kind: ResultKind, value: &Value) -> Result<Explanation> {
    let payload = ResultPayload::from_value(kind, value)?;
    Ok(explain(&payload))
}

/// Explain a parsed result payload.
pub fn explain(payload: &ResultPayload) -> Explanation {
    match payload {
        ResultPayload::Recursion(result) => explain_recursion(result),
        ResultPayload::Sorting(result) => explain_sorting(result),
        ResultPayload::BinarySearch(result) => explain_binary_search(result),
        ResultPayload::GreedyFuel(result) => explain_fuel(result),
        ResultPayload::GreedyBudget(result) => explain_budget(result),
        ResultPayload::Mst { algorithm, result } => explain_mst(result, *algorithm),
        ResultPayload::ShortestPath(result) => explain_shortest_path(result),
        ResultPayload::Knapsack(result) => explain_knapsack(result),
        ResultPayload::KnapsackComparison(result) => explain_comparison(result),
        ResultPayload::CombinedMetrics(result) => explain_combined(result),
        ResultPayload::PerformanceComparison(result) => explain_performance(result),
    }
}

fn fixed(value: f64) -> String {
    format!("{value:.2}")
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn time(nanoseconds: Option<u64>) -> String {
    nanoseconds.map(execution_time).unwrap_or_else(|| "N/A".into())
}

fn explain_recursion(result: &RecursionResult) -> Explanation {
    let Ok((metric, total)) = result.metric() else {
        let mut explanation = Explanation::new("Resultado recursivo", "N/A", "Sin total informado");
        explanation.note("La respuesta no incluye costoTotal ni distanciaTotal.");
        return explanation;
    };

    let label = metric.label();
    let unit = metric.unit();
    let mut explanation = Explanation::new(format!("Resultado recursivo: {label}"), fixed(total), unit)
        .stat("Método", result.metodo.clone().unwrap_or_else(|| "Recursivo".into()))
        .stat("Complejidad", result.complejidad.clone().unwrap_or_else(|| "O(n)".into()))
        .stat("Tiempo", time(result.tiempo_ejecucion_nanosegundos));
    if let Some(count) = result.numero_tramos {
        explanation = explanation.stat("Tramos", count.to_string());
    }

    let segments = match result.segments() {
        Ok(segments) => segments,
        Err(err) => {
            tracing::warn!(error = %err, "recursion result not explainable step by step");
            explanation.note(format!("No se pudo detallar el recorrido: {err}."));
            Vec::new()
        }
    };
    let lower = label.to_lowercase();
    let mut accumulated = 0.0;
    for (i, value) in segments.iter().enumerate() {
        accumulated += value;
        explanation.step(
            format!("Paso {}: Procesar tramo {}", i + 1, i + 1),
            format!(
                "El algoritmo recursivo suma el {lower} del tramo actual: {} {unit}",
                fixed(*value)
            ),
            Some(format!("{label} acumulado: {} {unit}", fixed(accumulated))),
        );
    }

    let listed: Vec<String> = segments.iter().map(|v| fixed(*v)).collect();
    explanation.note(format!(
        "Con tus datos: {} tramos [{}]. La función se llama a sí misma para cada tramo y suma su valor al acumulado.",
        segments.len(),
        listed.join(", ")
    ));
    explanation.note("Caso base: cuando no hay más tramos, retorna 0.");
    explanation.note(format!(
        "{}({}) = {} = {} {unit}",
        metric.function_name(),
        segments.len(),
        if listed.is_empty() { "0".to_string() } else { listed.join(" + ") },
        fixed(total)
    ));
    explanation.note(format!(
        "Complejidad O(n) donde n = {} tramos: cada tramo se procesa exactamente una vez.",
        segments.len()
    ));
    explanation
}

fn center_detail(center: &Center) -> String {
    let mut parts = Vec::new();
    if let Some(demand) = center.demand_level {
        parts.push(format!("Demanda: {demand}"));
    }
    if let Some(priority) = center.priority {
        parts.push(format!("Prioridad: {priority}"));
    }
    if let Some(city) = &center.city {
        parts.push(format!("Ciudad: {city}"));
    }
    if parts.is_empty() {
        "Sin datos adicionales".to_string()
    } else {
        parts.join(" · ")
    }
}

fn explain_sorting(result: &SortResult) -> Explanation {
    let centers = &result.centros_ordenados;
    let by_demand = result.algoritmo.eq_ignore_ascii_case("MergeSort");
    let mut explanation = Explanation::new(
        format!("Ordenamiento con {}", result.algoritmo),
        centers.len().to_string(),
        "Centros Ordenados",
    )
    .stat("Algoritmo", result.algoritmo.as_str())
    .stat("Complejidad", result.complejidad.as_str())
    .stat("Tiempo", time(result.tiempo_ejecucion_nanosegundos));

    for (i, center) in centers.iter().enumerate() {
        explanation.step(
            format!("#{} {}", i + 1, center.display_name()),
            center_detail(center),
            None,
        );
    }

    explanation.note(format!(
        "Estrategia: {} utiliza Divide y Vencerás. Se divide la lista en subarrays, se ordenan y se combinan.",
        result.algoritmo
    ));
    explanation.note(if by_demand {
        "Criterio: demanda, de mayor a menor."
    } else {
        "Criterio: prioridad, de menor a mayor."
    });
    if let Some(first) = centers.first() {
        let key = if by_demand {
            first.demand_level.map(|d| format!("Demanda: {d}"))
        } else {
            first.priority.map(|p| format!("Prioridad: {p}"))
        };
        explanation.note(format!(
            "Resultado: {} quedó en 1° lugar{}.",
            first.display_name(),
            key.map(|k| format!(" ({k})")).unwrap_or_default()
        ));
    }
    explanation
}

fn explain_binary_search(result: &BinarySearchResult) -> Explanation {
    let found = result.encontrado.then_some(result.centro.as_ref()).flatten();
    let mut explanation = match found {
        Some(_) => Explanation::new("Búsqueda binaria", "✓", "¡Centro Encontrado!"),
        None => Explanation::new("Búsqueda binaria", "✗", "Centro No Encontrado"),
    };
    if let Some(center) = found {
        explanation = explanation.stat("Centro", center.display_name());
    }
    if let (true, Some(index)) = (result.encontrado, result.indice) {
        explanation = explanation.stat("Posición", (index + 1).to_string());
    }
    explanation = explanation
        .stat(
            "Complejidad",
            result.complejidad.clone().unwrap_or_else(|| "O(log n)".into()),
        )
        .stat("Tiempo", time(result.tiempo_ejecucion_nanosegundos));

    for (i, center) in result.centros_ordenados.iter().enumerate() {
        let hit = result.encontrado && result.indice == Some(i);
        explanation.step(
            format!(
                "#{} {}{}",
                i + 1,
                center.display_name(),
                if hit { " (encontrado)" } else { "" }
            ),
            center_detail(center),
            None,
        );
    }

    let n = result.centros_ordenados.len();
    explanation.note("Estrategia: la búsqueda binaria aprovecha que la lista está ordenada.");
    explanation.note(
        "Se compara el centro del medio y se descarta la mitad que no puede contener el valor buscado, hasta encontrarlo o agotar opciones.",
    );
    if n > 0 {
        let lookups = (n as f64).log2().ceil().max(1.0) as u64;
        explanation.note(format!(
            "Complejidad O(log n): en lugar de revisar {n} centros uno por uno, basta con unos {lookups} pasos."
        ));
    }
    explanation
}

fn explain_fuel(result: &FuelDistributionResult) -> Explanation {
    let mut explanation = Explanation::new(
        "Distribución de combustible (Greedy)",
        format!("{}L", result.total_distribuido),
        "Litros Distribuidos",
    )
    .stat("Bidones Usados", result.cantidad_bidones_usados.to_string());
    if let Some(diff) = result.diferencia {
        explanation = explanation.stat("Diferencia", format!("{diff}L"));
    }
    explanation = explanation.stat(
        "Complejidad",
        result.complejidad.clone().unwrap_or_else(|| "O(n)".into()),
    );

    match result.sorted_distribution() {
        Ok(used) => {
            let containers = used
                .iter()
                .fold(0u64, |count, &(_, quantity)| count.saturating_add(quantity));
            if containers > MAX_STEPS as u64 {
                tracing::warn!(containers, limit = MAX_STEPS, "fuel distribution too large to list");
                explanation.note(format!(
                    "La distribución usa {containers} bidones; se omite el detalle paso a paso (máximo {MAX_STEPS})."
                ));
            } else {
                fuel_steps(&mut explanation, &used);
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "fuel distribution not explainable step by step");
            explanation.note(format!("No se pudo detallar la distribución: {err}."));
        }
    }

    explanation.note(
        "El algoritmo Greedy (voraz) siempre elige el bidón más grande que no exceda la cantidad restante.",
    );
    explanation.note("La complejidad es O(n) donde n es el número de tamaños disponibles.");
    explanation
}

/// One walkthrough step per container, stopping if the total overflows.
fn fuel_steps(explanation: &mut Explanation, used: &[(u64, u64)]) {
    let mut total: u64 = 0;
    let mut sequence = 0;
    for &(size, quantity) in used {
        for _ in 0..quantity {
            let Some(next) = total.checked_add(size) else {
                explanation.note(format!(
                    "El total acumulado excede {}L; el detalle se detiene en el paso {sequence}.",
                    u64::MAX
                ));
                return;
            };
            total = next;
            sequence += 1;
            explanation.step(
                format!("Paso {sequence}: Usar bidón de {size}L"),
                "El algoritmo greedy selecciona el bidón más grande disponible.",
                Some(format!("Total acumulado: {total}L")),
            );
        }
    }
}

fn explain_budget(result: &BudgetDistributionResult) -> Explanation {
    let mut explanation = Explanation::new(
        "Distribución de presupuesto (Greedy)",
        money(result.presupuesto_asignado),
        "Presupuesto Asignado",
    )
    .stat("Presupuesto Restante", money(result.presupuesto_restante))
    .stat("Proyectos", result.distribucion.len().to_string());

    let mut accumulated = 0.0;
    for (i, (project, amount)) in result.distribucion.iter().enumerate() {
        accumulated += amount;
        explanation.step(
            format!("Paso {}: Asignar a {project}", i + 1),
            format!("Monto asignado: {}", money(*amount)),
            Some(format!("Presupuesto acumulado: {}", money(accumulated))),
        );
    }

    explanation.note(
        "Estrategia: se ordenan los proyectos por ratio beneficio/costo y se financia primero el de mayor ratio.",
    );
    explanation.note("Si el presupuesto no alcanza para un proyecto completo, se asigna lo que queda.");
    explanation
}

fn explain_mst(result: &MstResult, algorithm: MstAlgorithm) -> Explanation {
    let mut explanation = Explanation::new(
        format!("Árbol de expansión mínima ({algorithm})"),
        money(result.costo_total),
        "Costo Total MST",
    )
    .stat("Algoritmo", algorithm.name())
    .stat("Aristas", result.numero_aristas.to_string())
    .stat("Complejidad", result.complejidad.as_str());

    let mut accumulated = 0.0;
    for (i, edge) in result.mst.iter().enumerate() {
        accumulated += edge.weight;
        explanation.step(
            format!(
                "Paso {}: Agregar ruta {} → {}",
                i + 1,
                edge.from_display(),
                edge.to_display()
            ),
            format!("Costo de la ruta: {}. {}", money(edge.weight), algorithm.rationale()),
            Some(format!("Costo acumulado: {}", money(accumulated))),
        );
    }

    explanation.note(
        "Problema que resuelve: conectar todos los centros gastando lo menos posible, sin rutas innecesarias.",
    );
    match algorithm {
        MstAlgorithm::Kruskal => {
            explanation.note("Kruskal ordena todas las rutas de menor a mayor costo.");
            explanation.note(
                "Agrega la siguiente ruta más barata solo si no crea un ciclo, hasta que todos los centros estén conectados.",
            );
        }
        MstAlgorithm::Prim => {
            explanation.note("Prim empieza desde un centro y mira las rutas disponibles desde él.");
            explanation.note(
                "Elige la ruta más barata hacia un centro nuevo y repite desde los ya conectados hasta conectarlos todos.",
            );
        }
    }
    explanation.note(format!(
        "Resultado final: {} rutas con un costo total de {}.",
        result.numero_aristas,
        money(result.costo_total)
    ));
    explanation
}

fn explain_shortest_path(result: &ShortestPathResult) -> Explanation {
    let source = result.source.as_str();
    let reachable = result.reachable();
    let unreachable = result.distances.len() - reachable.len();

    let mut explanation = Explanation::new(
        "Caminos más cortos (Dijkstra)",
        format!("Centro {source}"),
        "Centro de Origen",
    )
    .stat("Centros Alcanzados", reachable.len().to_string());
    if unreachable > 0 {
        explanation = explanation.stat("Inalcanzables", unreachable.to_string());
    }
    explanation = explanation.stat("Complejidad", result.complejidad.as_str());

    for (i, (vertex, distance)) in reachable.iter().enumerate() {
        explanation.step(
            format!("Paso {}: Centro {vertex}", i + 1),
            format!(
                "Distancia mínima desde Centro {source}: {}{}",
                fixed(*distance),
                if *vertex == source { " (origen)" } else { "" }
            ),
            None,
        );
    }

    explanation.note(format!(
        "Punto de partida: Centro {source}, con distancia 0."
    ));
    explanation.note(
        "Dijkstra explora siempre primero el centro más cercano que aún no se ha visitado y actualiza las distancias de sus vecinos.",
    );
    if unreachable > 0 {
        explanation.note(format!(
            "{unreachable} centros no tienen camino desde el origen."
        ));
    }
    explanation
}

fn explain_knapsack(result: &KnapsackResult) -> Explanation {
    let mut explanation = Explanation::new(
        format!("Mochila 0/1 ({})", result.algoritmo),
        money(result.beneficio_total),
        "Beneficio Total",
    )
    .stat("Costo Total", money(result.costo_total))
    .stat("Presupuesto Restante", money(result.presupuesto_restante))
    .stat(
        "Proyectos Seleccionados",
        result.proyectos_seleccionados.len().to_string(),
    )
    .stat("Complejidad", result.complejidad.as_str());

    for (i, name) in result.proyectos_seleccionados.iter().enumerate() {
        let detail = match result.project(name) {
            Some(project) => format!(
                "Costo {} · Beneficio {}",
                money(project.costo),
                money(project.beneficio)
            ),
            None => "Proyecto incluido en la solución óptima".to_string(),
        };
        explanation.step(format!("Paso {}: Seleccionar {name}", i + 1), detail, None);
    }

    explanation.note(
        "Programación dinámica: la tabla guarda el mejor beneficio para cada presupuesto considerando los primeros i proyectos.",
    );
    explanation.note("Cada proyecto se incluye completo o no se incluye (0/1).");
    if let Some(table) = &result.tabla_dp {
        explanation.note(format!(
            "Tabla DP de {} filas × {} columnas.",
            table.len(),
            table.first().map(Vec::len).unwrap_or(0)
        ));
    }
    explanation
}

fn explain_comparison(result: &KnapsackComparison) -> Explanation {
    let dp = &result.programacion_dinamica;
    let greedy = &result.greedy;
    let mut explanation = Explanation::new(
        "Comparación: Programación Dinámica vs Greedy",
        result.best(),
        "Mejor Estrategia",
    )
    .stat("Beneficio DP", money(dp.beneficio_total))
    .stat("Beneficio Greedy", money(greedy.beneficio_total))
    .stat("Diferencia", money(result.diferencia_beneficio));

    for (name, summary) in [("Programación Dinámica", dp), ("Greedy", greedy)] {
        let projects = if summary.proyectos_seleccionados.is_empty() {
            "ninguno".to_string()
        } else {
            summary.proyectos_seleccionados.join(", ")
        };
        explanation.step(
            name.to_string(),
            format!("Proyectos: {projects}"),
            Some(format!(
                "Beneficio {} · Costo {}",
                money(summary.beneficio_total),
                money(summary.costo_total)
            )),
        );
    }

    explanation.note("La programación dinámica garantiza el óptimo para la mochila 0/1.");
    explanation.note(
        "Greedy elige por ratio beneficio/costo; es más rápido pero puede quedarse corto.",
    );
    explanation
}

fn explain_combined(result: &CombinedMetricsResult) -> Explanation {
    let mut explanation = Explanation::new(
        "Métricas combinadas: costo por kilómetro",
        fixed(result.costo_por_km),
        "Costo por Kilómetro",
    )
    .stat("Costo Total", fixed(result.costo_total))
    .stat("Distancia Total", format!("{} km", fixed(result.distancia_total)))
    .stat("Complejidad", result.complejidad.clone().unwrap_or_else(|| "O(n)".into()));

    let segments = match result.segments() {
        Ok(segments) => segments,
        Err(err) => {
            tracing::warn!(error = %err, "combined metrics not explainable step by step");
            explanation.note(format!("No se pudo detallar el recorrido: {err}."));
            Vec::new()
        }
    };

    let (mut cost, mut distance) = (0.0, 0.0);
    for (i, &(segment_cost, segment_distance)) in segments.iter().enumerate() {
        cost += segment_cost;
        distance += segment_distance;
        let ratio = if distance > 0.0 { fixed(cost / distance) } else { "N/A".into() };
        explanation.step(
            format!("Paso {}: Calcular tramo {}", i + 1, i + 1),
            format!(
                "Costo tramo: {} | Distancia tramo: {} km",
                fixed(segment_cost),
                fixed(segment_distance)
            ),
            Some(format!(
                "Costo acum: {} | Distancia acum: {} km | Ratio: {ratio}",
                fixed(cost),
                fixed(distance)
            )),
        );
    }

    let costs: Vec<String> = segments.iter().map(|(c, _)| fixed(*c)).collect();
    let distances: Vec<String> = segments.iter().map(|(_, d)| fixed(*d)).collect();
    explanation.note(format!(
        "Con tus datos: costos [{}] y distancias [{}] km, ambas sumadas recursivamente en {} pasos.",
        costs.join(", "),
        distances.join(", "),
        segments.len()
    ));
    explanation.note(format!(
        "Costo por Km = {} ÷ {} = {} unidades/km",
        fixed(result.costo_total),
        fixed(result.distancia_total),
        fixed(result.costo_por_km)
    ));
    let verdict = if result.costo_por_km < 10.0 {
        "Ruta muy eficiente."
    } else if result.costo_por_km < 20.0 {
        "Eficiencia moderada."
    } else {
        "Considera optimizar la ruta."
    };
    explanation.note(format!(
        "Por cada kilómetro recorrido se gastan aproximadamente {} unidades. {verdict}",
        fixed(result.costo_por_km)
    ));
    explanation
}

fn explain_performance(result: &PerformanceComparison) -> Explanation {
    let recursive = result.recursive_ns();
    let iterative = result.iterative_ns();
    let difference = execution_time(result.difference_ns());
    let winner = if result.iterative_wins() { "Iterativo" } else { "Recursivo" };

    let mut explanation = Explanation::new(
        "Comparación de rendimiento: recursivo vs iterativo",
        winner,
        "Más Rápido",
    )
    .stat("Recursivo", execution_time(recursive))
    .stat("Iterativo", execution_time(iterative))
    .stat("Diferencia", difference.clone());

    explanation.step(
        "Recursivo".to_string(),
        "Se llama a sí mismo por cada tramo; usa la pila de llamadas, O(n) memoria.",
        Some(execution_time(recursive)),
    );
    explanation.step(
        "Iterativo".to_string(),
        "Recorre los tramos con un bucle simple; solo variables locales, O(1) memoria.",
        Some(execution_time(iterative)),
    );

    if let Some(analysis) = &result.analisis {
        explanation.note(analysis.clone());
    }
    explanation.note("Complejidad temporal: ambos son O(n).");
    explanation.note("Complejidad espacial: recursivo O(n) frente a iterativo O(1).");
    explanation.note(if result.iterative_wins() {
        format!("El iterativo ganó por {difference}: es la mejor opción en tiempo y memoria.")
    } else {
        format!(
            "El recursivo fue más rápido por {difference}; puede pasar con pocos datos o por optimizaciones del compilador."
        )
    });
    explanation
}
