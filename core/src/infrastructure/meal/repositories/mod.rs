pub mod meal_record_repository;
