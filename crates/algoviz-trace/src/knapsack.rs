//! Illustrative traces for the 0/1 knapsack solution.
//!
//! The service reports which projects the DP solution selected, not the
//! table walk that chose them, so these traces are explanatory rather than
//! a faithful replay of the computation. Per-project figures are taken from
//! the service's project catalogue when it is present; a project missing
//! from the catalogue contributes nothing to the running totals.

use crate::format::amount;
use crate::payload::KnapsackResult;
use crate::step::{Step, StepKind, StepPayload, Trace};

/// One `select` step per selected project, in selection order.
pub fn generate_knapsack_trace(result: &KnapsackResult) -> Trace {
    let mut cumulative_cost = 0.0;
    let mut cumulative_benefit = 0.0;

    let steps = result
        .proyectos_seleccionados
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let project = result.project(name);
            let message = match project {
                Some(p) => {
                    cumulative_cost += p.costo;
                    cumulative_benefit += p.beneficio;
                    format!(
                        "Seleccionar {name} (costo ${}, beneficio ${}): beneficio acumulado ${} | costo ${}",
                        amount(p.costo),
                        amount(p.beneficio),
                        amount(cumulative_benefit),
                        amount(cumulative_cost)
                    )
                }
                None => format!("Seleccionar {name} (costo y beneficio no informados)"),
            };
            Step::new(
                StepKind::Select,
                index,
                StepPayload::Selection {
                    project: name.clone(),
                    cost: project.map(|p| p.costo),
                    benefit: project.map(|p| p.beneficio),
                    cumulative_cost,
                    cumulative_benefit,
                },
                message,
            )
        })
        .collect();

    Trace::new(steps)
}

/// One `fill-row` step per DP table row, revealing the table top to bottom.
///
/// Row 0 is the empty-selection baseline; row `i` covers the first `i`
/// projects.
pub fn generate_dp_table_trace(table: &[Vec<f64>]) -> Trace {
    let steps = table
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let best = row.iter().copied().fold(0.0, f64::max);
            let message = if index == 0 {
                "Fila 0: sin proyectos, beneficio 0 para todo presupuesto".to_string()
            } else {
                format!(
                    "Fila {index}: se evalúa incluir el proyecto {index} para presupuestos 0..{}; mejor beneficio {}",
                    row.len().saturating_sub(1),
                    amount(best)
                )
            };
            Step::new(
                StepKind::FillRow,
                index,
                StepPayload::TableRow { row: row.clone() },
                message,
            )
        })
        .collect();

    Trace::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(with_catalogue: bool) -> KnapsackResult {
        let mut value = json!({
            "proyectosSeleccionados": ["Puente", "Depósito"],
            "beneficioTotal": 500.0,
            "costoTotal": 70.0,
            "presupuestoRestante": 30.0,
            "algoritmo": "Programación Dinámica",
            "complejidad": "O(n × P)"
        });
        if with_catalogue {
            value["proyectos"] = json!([
                { "nombre": "Puente", "costo": 50.0, "beneficio": 300.0 },
                { "nombre": "Depósito", "costo": 20.0, "beneficio": 200.0 },
                { "nombre": "Rampa", "costo": 90.0, "beneficio": 100.0 }
            ]);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn catalogue_figures_accumulate() {
        let trace = generate_knapsack_trace(&result(true));

        assert_eq!(trace.len(), 2);
        match &trace.steps()[1].payload {
            StepPayload::Selection {
                cumulative_cost,
                cumulative_benefit,
                cost,
                ..
            } => {
                assert_eq!(*cumulative_cost, 70.0);
                assert_eq!(*cumulative_benefit, 500.0);
                assert_eq!(*cost, Some(20.0));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn missing_catalogue_uses_no_placeholders() {
        let trace = generate_knapsack_trace(&result(false));

        for step in &trace {
            assert!(matches!(
                step.payload,
                StepPayload::Selection {
                    cost: None,
                    benefit: None,
                    cumulative_cost,
                    ..
                } if cumulative_cost == 0.0
            ));
            assert!(step.message.contains("no informados"));
        }
    }

    #[test]
    fn dp_rows_revealed_in_order() {
        let table = vec![vec![0.0, 0.0, 0.0], vec![0.0, 10.0, 10.0], vec![0.0, 10.0, 15.0]];
        let trace = generate_dp_table_trace(&table);

        assert_eq!(trace.len(), 3);
        assert!(trace.iter().all(|s| s.kind == StepKind::FillRow));
        assert!(trace.steps()[2].message.ends_with("mejor beneficio 15"));
        assert!(generate_dp_table_trace(&[]).is_empty());
    }
}
