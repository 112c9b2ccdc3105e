#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use jtool_excel::ExcelRow;

#[derive(Debug, Clone, PartialEq, Default, ExcelRow)]
#[excel(sheet = "Employees", height = 28, font_size = 14)]
pub struct Employee {
    #[excel(index = 0, name = "Name", width = 18, bold = true)]
    pub name: String,
    #[excel(index = 1, name = "Age", width = 8)]
    pub age: u32,
    #[excel(index = 2, name = "Salary", format = "#,##0.00")]
    pub salary: f64,
    #[excel(index = 3, name = "Hired", format = "yyyy-mm-dd")]
    pub hired: NaiveDate,
    #[excel(index = 4, name = "Last login")]
    pub last_login: Option<NaiveDateTime>,
    #[excel(index = 5, name = "Active")]
    pub active: bool,
    pub internal_note: String,
}

pub fn employees() -> Vec<Employee> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    vec![
        Employee {
            name: "Ada".into(),
            age: 36,
            salary: 12_500.5,
            hired: date(2019, 3, 1),
            last_login: date(2024, 5, 6).and_hms_opt(9, 30, 0),
            active: true,
            internal_note: String::new(),
        },
        Employee {
            name: "Grace".into(),
            age: 45,
            salary: 9_999.0,
            hired: date(2015, 11, 30),
            last_login: None,
            active: false,
            internal_note: String::new(),
        },
    ]
}

#[derive(Debug, Default, ExcelRow)]
#[excel(sheet = "Legacy", kind = "xls")]
pub struct LegacyRow {
    #[excel(index = 0, name = "Code")]
    pub code: String,
}

#[derive(Debug, Default, ExcelRow)]
#[excel(sheet = "Employees")]
pub struct StrictAges {
    #[excel(index = 0, name = "Name")]
    pub name: String,
    #[excel(index = 2, name = "Salary")]
    pub salary: u8,
}
