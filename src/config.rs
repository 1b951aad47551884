use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;

/// Payroll policy for one run: statutory rates and the normalization
/// constant used to derive a daily rate. A single policy applies to every
/// employee in a run; there is no per-employee override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollPolicy {
    /// Fraction of base monthly salary, e.g. 0.10 for 10%.
    pub tax_rate: Decimal,
    /// Provident fund fraction of base monthly salary, e.g. 0.12 for 12%.
    pub pf_rate: Decimal,
    /// Fixed normalization constant for the daily rate. Distinct from the
    /// calendar-accurate working-day count of a specific month.
    pub standard_working_days_per_month: u32,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            pf_rate: Decimal::new(12, 2),
            standard_working_days_per_month: 25,
        }
    }
}

impl PayrollPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tax_rate: env_parsed("PAYROLL_TAX_RATE").unwrap_or(defaults.tax_rate),
            pf_rate: env_parsed("PAYROLL_PF_RATE").unwrap_or(defaults.pf_rate),
            standard_working_days_per_month: env_parsed("PAYROLL_STANDARD_WORKING_DAYS")
                .unwrap_or(defaults.standard_working_days_per_month),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Upper bound on concurrent per-employee calculations in a batch run.
    pub batch_workers: usize,
    pub policy: PayrollPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            batch_workers: env_parsed("PAYROLL_BATCH_WORKERS").unwrap_or(8),
            policy: PayrollPolicy::from_env(),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_rates() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.tax_rate, Decimal::new(10, 2));
        assert_eq!(policy.pf_rate, Decimal::new(12, 2));
        assert_eq!(policy.standard_working_days_per_month, 25);
    }
}
