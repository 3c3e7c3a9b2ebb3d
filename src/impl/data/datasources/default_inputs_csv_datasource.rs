use std::{collections::BTreeMap, str::FromStr as _};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use rust_decimal::Decimal;

use crate::{
    data::models::{
        month_model::MonthModel,
        monetary_input_model::{MonetaryInputModel, RateInputModel},
    },
    entities::{DefaultInputsTable, Month, MonthlyRecordInputs},
    errors::{InvalidCsv, InvalidCsvContent, ReadError},
};

/// Reads historical per-month default inputs. Expected columns:
///
/// `year, month, administration_fee, retroactive_charge, parking_charge,
/// penalty_charge, common_area_charge, extraordinary_fee, other_charge,
/// monthly_interest_rate`
///
/// Amount cells are coerced like form input (blank = 0); a blank rate means
/// the fallback rate applies.
#[async_trait]
pub(crate) trait DefaultInputsCsvDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<Vec<DefaultInputsTable>, ServerError>;

    async fn from_file<P>(&self, path: P) -> Result<Vec<DefaultInputsTable>, ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct DefaultInputsCsvDatasourceImpl;

impl DefaultInputsCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DefaultInputsCsvDatasource for DefaultInputsCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<Vec<DefaultInputsTable>, ServerError> {
        let rows = csv::Reader::from_reader(s.as_bytes())
            .records()
            .map(|r| {
                r.map_err(|e| InvalidCsv::with_debug(&e)).and_then(|r| {
                    // Extract from CSV record.
                    let raw_year = r.get(0).unwrap_or("");
                    let raw_month = r.get(1).unwrap_or("");
                    let amount = |i: usize| -> Decimal {
                        MonetaryInputModel::parse(r.get(i).unwrap_or("")).0
                    };

                    // Parse.
                    let year: i32 = raw_year.trim().parse().map_err(|_| {
                        InvalidCsvContent::new(&format!("invalid year '{}'", raw_year))
                    })?;
                    let month: Month = MonthModel::from_str(raw_month)?.into();

                    // Build.
                    let mut inputs = MonthlyRecordInputs::new(month);
                    inputs.administration_fee = amount(2);
                    inputs.retroactive_charge = amount(3);
                    inputs.parking_charge = amount(4);
                    inputs.penalty_charge = amount(5);
                    inputs.common_area_charge = amount(6);
                    inputs.extraordinary_fee = amount(7);
                    inputs.other_charge = amount(8);
                    inputs.monthly_interest_rate =
                        RateInputModel::parse(r.get(9).unwrap_or("")).0;
                    Ok((year, inputs))
                })
            })
            .collect::<Result<Vec<_>, ServerError>>()?;

        let tables = rows.into_iter().try_fold(
            BTreeMap::<i32, DefaultInputsTable>::new(),
            |mut tables, (year, inputs)| {
                let table = tables
                    .entry(year)
                    .or_insert_with(|| DefaultInputsTable::new(year));
                if table.months.contains_key(&inputs.month) {
                    return Err(InvalidCsvContent::new(&format!(
                        "duplicate defaults for {} {}",
                        inputs.month, year
                    )));
                }
                table.months.insert(inputs.month, inputs);
                Ok(tables)
            },
        )?;
        Ok(tables.into_values().collect())
    }

    async fn from_file<P>(&self, path: P) -> Result<Vec<DefaultInputsTable>, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        self.from_string(
            &tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ReadError::with_debug(&e))?,
        )
    }
}
