use contracts::domain::a001_customer::Customer;
use std::collections::HashSet;

use crate::domain::a001_customer::NameModel;
use crate::shared::config::Config;
use crate::shared::data::csv_storage::{self, TableReport};
use crate::shared::random::{stage_rng, GenRng, CUSTOMERS_STREAM};
use crate::usecases::common::GenerationError;

/// Inclusive customer id range plus the retry budget for unique emails
#[derive(Debug, Clone, Copy)]
pub struct CustomerRange {
    pub min_id: i64,
    pub max_id: i64,
    pub max_email_attempts: u32,
}

impl CustomerRange {
    pub fn len(&self) -> usize {
        if self.max_id < self.min_id {
            0
        } else {
            (self.max_id - self.min_id + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate one customer per id in `range`, drawing names from `model`.
///
/// Emails are unique within the run: a colliding candidate is redrawn up to
/// `max_email_attempts` times before the run fails.
pub fn generate_customers(
    range: CustomerRange,
    model: &NameModel,
    rng: &mut GenRng,
) -> Result<Vec<Customer>, GenerationError> {
    if range.min_id > range.max_id {
        return Err(GenerationError::InvalidRange {
            min: range.min_id,
            max: range.max_id,
        });
    }
    if model.is_empty() {
        return Err(GenerationError::EmptyDimension("name model"));
    }

    let mut customers = Vec::with_capacity(range.len());
    let mut used_emails: HashSet<String> = HashSet::with_capacity(range.len());

    for customer_id in range.min_id..=range.max_id {
        let first_name = model
            .first_name(rng)
            .ok_or(GenerationError::EmptyDimension("first name"))?;
        let last_name = model
            .last_name(rng)
            .ok_or(GenerationError::EmptyDimension("last name"))?;
        let email = unique_email(model, rng, &mut used_emails, customer_id, range.max_email_attempts)?;

        customers.push(Customer::new(
            customer_id,
            first_name.to_string(),
            last_name.to_string(),
            email,
        ));
    }

    Ok(customers)
}

fn unique_email(
    model: &NameModel,
    rng: &mut GenRng,
    used: &mut HashSet<String>,
    customer_id: i64,
    max_attempts: u32,
) -> Result<String, GenerationError> {
    for _ in 0..max_attempts {
        let candidate = model
            .email(rng)
            .ok_or(GenerationError::EmptyDimension("email model"))?;
        if used.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }
    Err(GenerationError::EmailSpaceExhausted {
        customer_id,
        attempts: max_attempts,
    })
}

/// Generate the customer table from configuration and publish `clientes.csv`
pub fn execute(config: &Config) -> Result<(Vec<Customer>, TableReport), GenerationError> {
    let gen = &config.generation;
    let range = CustomerRange {
        min_id: gen.customer_id_min,
        max_id: gen.customer_id_max,
        max_email_attempts: gen.max_email_attempts,
    };

    let mut rng = stage_rng(gen.seed, CUSTOMERS_STREAM);
    let customers = generate_customers(range, &NameModel::es_mx(), &mut rng)?;

    let report = csv_storage::write_table(&config.data.customers_path(), &customers)?;
    tracing::info!(
        "U101: {} customers written to {} (sha256 {})",
        report.rows,
        report.path.display(),
        report.sha256
    );

    Ok((customers, report))
}
