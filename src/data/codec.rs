//! Conversion between [`Emissivities`] and a [`TableSet`].
//!
//! Layout:
//! * keyword `emissvar` – variable tag (`E` for specific energy)
//! * keyword `lte` – `yes` / `no`
//! * table `emissivities` – columns `nu` and `jnu` (one row per frequency)
//! * table `emissivity_variable` – one column named after the variable

use ndarray::{Array1, Array2};

use super::model::{Emissivities, EmissivityVariable};
use super::table_set::{Column, Table, TableSet};
use crate::error::EmissivityError;

const KEYWORD_VARIABLE: &str = "emissvar";
const KEYWORD_LTE: &str = "lte";
const TABLE_EMISSIVITIES: &str = "emissivities";
const TABLE_VARIABLE: &str = "emissivity_variable";

fn bool_to_str(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

impl Emissivities {
    /// Write the table into `table_set`.
    ///
    /// Nothing is written unless the table is complete.
    pub fn to_table_set(&self, table_set: &mut TableSet) -> Result<(), EmissivityError> {
        let (var_name, var, nu, jnu) = self.parts()?;

        let mut temissvar = Table::new(TABLE_VARIABLE);
        temissvar.add_column(var_name.name(), var.clone())?;

        let mut temiss = Table::new(TABLE_EMISSIVITIES);
        temiss.add_column("nu", nu.clone())?;
        temiss.add_column("jnu", jnu.clone())?;

        table_set.add_keyword(KEYWORD_VARIABLE, var_name.code());
        table_set.add_keyword(KEYWORD_LTE, bool_to_str(self.is_lte()));
        table_set.append(temiss);
        table_set.append(temissvar);
        Ok(())
    }

    /// Read a table written by [`Emissivities::to_table_set`].
    ///
    /// Every array goes through the validating setters. `lte` is true only
    /// when stored as `yes`.
    pub fn from_table_set(table_set: &TableSet) -> Result<Self, EmissivityError> {
        let code = keyword(table_set, KEYWORD_VARIABLE)?;
        let var_name = EmissivityVariable::from_code(code)?;

        let temissvar = table(table_set, TABLE_VARIABLE)?;
        let var = scalar_column(temissvar, var_name.name())?;

        let temiss = table(table_set, TABLE_EMISSIVITIES)?;
        let nu = scalar_column(temiss, "nu")?;
        let jnu = vector_column(temiss, "jnu")?;

        let mut emissivities = Emissivities::new();
        emissivities.set_var_name(Some(var_name));
        emissivities.set_var(var)?;
        emissivities.set_nu(nu)?;
        emissivities.set_jnu(jnu)?;
        emissivities.set_is_lte(keyword(table_set, KEYWORD_LTE)? == "yes");
        Ok(emissivities)
    }
}

fn keyword<'a>(table_set: &'a TableSet, key: &str) -> Result<&'a str, EmissivityError> {
    table_set
        .keyword(key)
        .ok_or_else(|| EmissivityError::MissingKeyword(key.to_string()))
}

fn table<'a>(table_set: &'a TableSet, name: &str) -> Result<&'a Table, EmissivityError> {
    table_set
        .table(name)
        .ok_or_else(|| EmissivityError::MissingTable(name.to_string()))
}

fn column<'a>(table: &'a Table, name: &str) -> Result<&'a Column, EmissivityError> {
    table.column(name).ok_or_else(|| EmissivityError::MissingColumn {
        table: table.name().to_string(),
        column: name.to_string(),
    })
}

fn scalar_column(table: &Table, name: &str) -> Result<Array1<f64>, EmissivityError> {
    match column(table, name)? {
        Column::Scalar(values) => Ok(values.clone()),
        Column::Vector(_) => Err(EmissivityError::ColumnKind {
            column: name.to_string(),
            expected: "scalar",
        }),
    }
}

fn vector_column(table: &Table, name: &str) -> Result<Array2<f64>, EmissivityError> {
    match column(table, name)? {
        Column::Vector(values) => Ok(values.clone()),
        Column::Scalar(_) => Err(EmissivityError::ColumnKind {
            column: name.to_string(),
            expected: "vector",
        }),
    }
}
