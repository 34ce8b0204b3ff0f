// lib.rs - Root module for the pg_seeder library
//
// Seeds a PostgreSQL database before a test and cleans it afterwards:
//
//   let options = SeederOptions::from_env(
//       ["CREATE TABLE t (id int)", "INSERT INTO t VALUES (1)"],
//       "DROP TABLE t",
//   )?;
//   let test = extend_with_seeder(&TestType::new(), &options);
//
//   test.run("reads t", || async {
//       // t exists here and holds one row
//       Ok(())
//   })
//   .await?;
//   // t is gone again

pub mod config;
pub mod db;
pub mod error;
/// Setup/teardown units that wrap test bodies
pub mod fixtures;
pub mod logging;
pub mod queries;
pub mod runner;

pub use config::{ConnectionConfig, SeederOptions, StatementSet};
pub use error::SeederError;
pub use fixtures::seeder::{create_seeder_fixture, with_seeded_db, DbSeeder};
pub use fixtures::{Fixture, FixtureError, Use};
pub use queries::{clean_database, run_statements, seed_database};
pub use runner::{extend_with_seeder, TestError, TestType, SEEDER_FIXTURE};
