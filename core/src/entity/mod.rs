pub mod meal_records;
