use crate::db::procedure::install_bonus_procedure;
use crate::db::{DataSource, Statement};
use crate::error::ReportError;
use crate::models::BonusRow;

const SELECT_BONUSES: &str =
    "SELECT Id, Name, Salary, PerformanceRating, Bonus FROM CalculateBonuses ORDER BY Id";

/// Bonus for every employee, ordered by id. Installs the routine on first use.
pub fn calculate_bonuses(source: &impl DataSource) -> Result<Vec<BonusRow>, ReportError> {
    install_bonus_procedure(source)?;
    let rows: Vec<BonusRow> = source.fetch(&Statement::literal(SELECT_BONUSES))?;
    tracing::info!(count = rows.len(), "Bonus report complete");
    Ok(rows)
}
