//! Client-side catalog of proposable policies.

use crate::error::ModelError;
use crate::model::{Coordinates, Policy};

const CATALOG: &[(&str, f64, f64)] = &[
    ("Generic Economic Left, Libertarian", -5.0, -5.0),
    ("Generic Economic Right, Libertarian", 5.0, -5.0),
    ("Generic Economic Left, Authoritarian", -5.0, 5.0),
    ("Generic Economic Right, Authoritarian", 5.0, 5.0),
    ("Universal healthcare", -9.0, -9.0),
    ("Increased military spending", 10.0, 8.0),
    ("Universal basic income", -10.0, -7.0),
    ("Free public education", -9.0, -7.0),
    ("Increased infrastructure spending", -9.0, -6.0),
    ("Increased immigration", -9.0, -7.0),
    ("Carbon tax", -8.0, 8.0),
    ("Gun control laws", -8.0, 8.0),
    ("Increased environmental regulations", -8.0, 8.0),
    ("National service program", -6.0, 8.0),
    ("Capital punishment", -6.0, 8.0),
    ("Regularization of energy markets", -5.0, 7.0),
    ("Fund public schools partially with tax and sponsorships", 0.0, 0.0),
    ("School choice and vouchers", -5.0, 0.0),
    ("State-funded insurance system with private hospitals", -6.0, 6.0),
    ("Deregulation of financial markets", 9.0, -8.0),
    ("Privatization of Social Security ", 10.0, -6.0),
    ("Abolition of minimum wage", 10.0, -8.0),
    ("Privatization of healthcare", 10.0, -10.0),
    ("Abolition of inheritance tax", 10.0, -10.0),
];

pub fn default_policies() -> Vec<Policy> {
    CATALOG
        .iter()
        .map(|(description, x, y)| Policy::new(*description, Coordinates::new(*x, *y)))
        .collect()
}

/// Case-insensitive search over policy descriptions. With `exact` the whole
/// description must match, otherwise any substring does.
pub fn filter_policies<'a>(policies: &'a [Policy], query: &str, exact: bool) -> Vec<&'a Policy> {
    let query = query.to_lowercase();
    policies
        .iter()
        .filter(|policy| {
            let title = policy.description.to_lowercase();
            if exact {
                title == query
            } else {
                title.contains(&query)
            }
        })
        .collect()
}

/// Resolves a selector typed by an operator: a 1-based index into `policies`,
/// an exact description, or a substring that matches exactly one policy.
pub fn find_policy(policies: &[Policy], selector: &str) -> Result<Policy, ModelError> {
    let selector = selector.trim();
    if let Ok(index) = selector.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| policies.get(i))
            .cloned()
            .ok_or(ModelError::PolicyIndexOutOfRange {
                index,
                len: policies.len(),
            });
    }

    if let Some(policy) = filter_policies(policies, selector, true).first() {
        return Ok((*policy).clone());
    }

    match filter_policies(policies, selector, false).as_slice() {
        [] => Err(ModelError::UnknownPolicy(selector.to_string())),
        [single] => Ok((*single).clone()),
        many => Err(ModelError::AmbiguousPolicy {
            query: selector.to_string(),
            count: many.len(),
        }),
    }
}
