//! Single-objective production planning.
//!
//! Each product is a continuous quantity in `[0, demand]`. Each resource
//! contributes one `Σ consumption·quantity ≤ availability` row, and the
//! objective maximizes total profit, where a product's unit profit is its
//! price minus the cost of the resources it consumes.

use super::{ProblemError, require_finite, require_non_negative};
use ordo_core::{Bounds, Model, Sense, SolveResult, new_builder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductionPlan {
    pub resources: Vec<Resource>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    pub name: String,
    pub availability: f64,
    #[serde(default)]
    pub unit_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub demand: f64,
    /// Units of each resource used per unit produced. Missing resources are 0.
    #[serde(default)]
    pub consumption: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub profit: f64,
    pub products: Vec<ProductQuantity>,
    pub resources: Vec<ResourceUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: f64,
    pub unit_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub name: String,
    pub used: f64,
    pub available: f64,
}

impl ProductionPlan {
    fn validate(&self) -> Result<(), ProblemError> {
        if self.products.is_empty() {
            return Err(ProblemError::invalid(
                "products",
                "at least one product is required",
            ));
        }

        let mut seen = BTreeSet::new();
        for (index, resource) in self.resources.iter().enumerate() {
            if !seen.insert(resource.name.as_str()) {
                return Err(ProblemError::invalid(
                    format!("resources[{index}].name"),
                    format!("duplicate resource '{}'", resource.name),
                ));
            }
            require_non_negative(
                &format!("resources[{index}].availability"),
                resource.availability,
            )?;
            require_non_negative(&format!("resources[{index}].unit_cost"), resource.unit_cost)?;
        }

        for (index, product) in self.products.iter().enumerate() {
            require_finite(&format!("products[{index}].price"), product.price)?;
            require_non_negative(&format!("products[{index}].demand"), product.demand)?;
            for (resource, amount) in &product.consumption {
                let field = format!("products[{index}].consumption.{resource}");
                if !seen.contains(resource.as_str()) {
                    return Err(ProblemError::invalid(field, "unknown resource"));
                }
                require_non_negative(&field, *amount)?;
            }
        }
        Ok(())
    }

    fn consumption(&self, product: &Product, resource: &Resource) -> f64 {
        product
            .consumption
            .get(&resource.name)
            .copied()
            .unwrap_or(0.0)
    }

    /// Price minus the cost of consumed resources.
    pub fn unit_profit(&self, product: &Product) -> f64 {
        self.resources.iter().fold(product.price, |profit, resource| {
            profit - self.consumption(product, resource) * resource.unit_cost
        })
    }

    pub fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;

        let bounds: Vec<Bounds> = self
            .products
            .iter()
            .map(|product| Bounds::new(0.0, product.demand))
            .collect();
        let lhs: Vec<Vec<f64>> = self
            .resources
            .iter()
            .map(|resource| {
                self.products
                    .iter()
                    .map(|product| self.consumption(product, resource))
                    .collect()
            })
            .collect();
        let availability: Vec<f64> = self
            .resources
            .iter()
            .map(|resource| resource.availability)
            .collect();
        let profits: Vec<f64> = self
            .products
            .iter()
            .map(|product| self.unit_profit(product))
            .collect();

        let model = new_builder()
            .add_variables(
                self.products.len(),
                |index| self.products[index].name.clone(),
                Some(bounds.as_slice()),
                None,
            )
            .map_err(|err| ProblemError::model("products", err))?
            .add_constraints_from_matrix(&lhs, &availability)
            .map_err(|err| ProblemError::model("resources", err))?
            .add_objective(&profits, Sense::Maximize)
            .map_err(|err| ProblemError::model("products", err))?
            .build();
        Ok(model)
    }

    pub fn summarize(&self, result: &SolveResult) -> ProductionSummary {
        let quantity = |product: &Product| result.value(&product.name).unwrap_or(0.0);
        let products = self
            .products
            .iter()
            .map(|product| ProductQuantity {
                name: product.name.clone(),
                quantity: quantity(product),
                unit_profit: self.unit_profit(product),
            })
            .collect();
        let resources = self
            .resources
            .iter()
            .map(|resource| ResourceUsage {
                name: resource.name.clone(),
                used: self
                    .products
                    .iter()
                    .map(|product| self.consumption(product, resource) * quantity(product))
                    .sum(),
                available: resource.availability,
            })
            .collect();
        ProductionSummary {
            profit: result.objective_value(0).unwrap_or(0.0),
            products,
            resources,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::problems::ProblemFile;
    use ordo_core::{ComparisonSense, VariableId};

    fn toy_factory() -> ProductionPlan {
        let file = ProblemFile::from_json(
            r#"{
                "kind": "production",
                "resources": [
                    {"name": "work_hours", "availability": 40, "unit_cost": 10},
                    {"name": "wood_kg", "availability": 30, "unit_cost": 2}
                ],
                "products": [
                    {"name": "train", "price": 50, "demand": 8,
                     "consumption": {"work_hours": 2, "wood_kg": 3}},
                    {"name": "doll", "price": 35, "demand": 20,
                     "consumption": {"work_hours": 1.5}}
                ]
            }"#,
        )
        .unwrap();
        match file {
            ProblemFile::Production(plan) => plan,
            other => panic!("expected a production plan, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unit_profit_subtracts_resource_costs() {
        let plan = toy_factory();
        assert_eq!(plan.unit_profit(&plan.products[0]), 50.0 - 2.0 * 10.0 - 3.0 * 2.0);
        assert_eq!(plan.unit_profit(&plan.products[1]), 35.0 - 1.5 * 10.0);
    }

    #[test]
    fn test_builds_one_row_per_resource() {
        let model = toy_factory().build().unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 2);
        assert_eq!(model.num_objectives(), 1);

        let doll = model.variable_by_name("doll").unwrap();
        assert_eq!(model.variable(doll).unwrap().bounds, Bounds::new(0.0, 20.0));

        let wood = &model.constraints()[1];
        assert_eq!(wood.sense(), ComparisonSense::LessEqual);
        assert_eq!(wood.rhs(), 30.0);
        assert_eq!(wood.terms(), &[(VariableId::new(0), 3.0)]);

        let objective = model.objective(0).unwrap();
        assert_eq!(objective.sense(), Sense::Maximize);
        assert_eq!(objective.terms()[1], (doll, 20.0));
    }

    #[test]
    fn test_validation_errors() {
        let mut plan = toy_factory();
        plan.products[1]
            .consumption
            .insert("paint".to_string(), 1.0);
        let err = plan.build().unwrap_err();
        assert_eq!(err.field(), "products[1].consumption.paint");

        let mut plan = toy_factory();
        plan.resources[1].name = "work_hours".to_string();
        assert_eq!(plan.build().unwrap_err().field(), "resources[1].name");

        let mut plan = toy_factory();
        plan.products[0].demand = -1.0;
        assert_eq!(plan.build().unwrap_err().field(), "products[0].demand");

        let mut plan = toy_factory();
        plan.products.clear();
        assert_eq!(plan.build().unwrap_err().code(), "INPUT_INVALID_FIELD");
    }

    #[test]
    fn test_duplicate_product_reported_by_model() {
        let mut plan = toy_factory();
        plan.products[1].name = "train".to_string();
        let err = plan.build().unwrap_err();
        assert_eq!(err.code(), "VARIABLE_DUPLICATE_NAME");
    }
}
