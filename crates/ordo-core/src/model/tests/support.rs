use crate::model::Model;
use crate::types::{Bounds, Variable};
use ordo_expr::VariableId;

pub(super) fn bounded_continuous(name: &str, lower: f64, upper: f64) -> Variable {
    Variable::continuous(name, Bounds::new(lower, upper))
}

/// Model with `x ∈ [0, 10]` and `y ∈ [0, 20]`.
pub(super) fn two_variable_model() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let x = model
        .add_variable(bounded_continuous("x", 0.0, 10.0))
        .expect("add x");
    let y = model
        .add_variable(bounded_continuous("y", 0.0, 20.0))
        .expect("add y");
    (model, x, y)
}
