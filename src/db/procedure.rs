//! The `CalculateBonuses` routine.
//!
//! SQLite has no stored procedures, so the routine is a view whose `Bonus`
//! column calls the `bonus(salary_cents, performance_rating)` scalar function.
//! The function is registered on every connection [`super::Database`] opens, and the
//! arithmetic runs in fixed-point.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::port::{DataSource, Statement};
use super::value::{from_minor_units, MONEY_SCALE};
use crate::error::ProcedureInstallError;

pub const BONUS_PROCEDURE: &str = "CalculateBonuses";

const BONUS_FUNCTION: &str = "bonus";

const CREATE_BONUS_PROCEDURE: &str = "CREATE VIEW CalculateBonuses AS
    SELECT id AS Id,
           name AS Name,
           salary_cents AS Salary,
           performance_rating AS PerformanceRating,
           bonus(salary_cents, performance_rating) AS Bonus
    FROM employees";

/// Share of salary paid per rating point.
pub fn bonus_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// `salary × (rating × 0.05)`, rounded to cents.
///
/// Returns `None` when the rating is not finite or the product overflows.
pub fn compute_bonus(salary: Decimal, performance_rating: f64) -> Option<Decimal> {
    let rating = Decimal::from_f64(performance_rating)?;
    let factor = rating.checked_mul(bonus_rate())?;
    let bonus = salary.checked_mul(factor)?;
    Some(bonus.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Register the scalar functions the routine depends on.
pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        BONUS_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let salary_cents: i64 = ctx.get(0)?;
            let rating: f64 = ctx.get(1)?;
            compute_bonus(from_minor_units(salary_cents), rating)
                .map(|bonus| bonus.to_string())
                .ok_or_else(|| {
                    rusqlite::Error::UserFunctionError(
                        format!(
                            "bonus overflow for salary {} and rating {}",
                            salary_cents, rating
                        )
                        .into(),
                    )
                })
        },
    )
}

/// Create the bonus routine if it does not exist yet.
///
/// Check-then-create; two concurrent installers may both attempt creation.
/// Returns whether this call created it.
pub fn install_bonus_procedure(source: &impl DataSource) -> Result<bool, ProcedureInstallError> {
    let wrap = |err| ProcedureInstallError {
        name: BONUS_PROCEDURE.to_string(),
        source: err,
    };

    if source.object_exists(BONUS_PROCEDURE).map_err(wrap)? {
        tracing::debug!("Procedure {} already present", BONUS_PROCEDURE);
        return Ok(false);
    }

    source
        .execute(&Statement::literal(CREATE_BONUS_PROCEDURE))
        .map_err(wrap)?;
    tracing::info!("Procedure {} created", BONUS_PROCEDURE);
    Ok(true)
}
