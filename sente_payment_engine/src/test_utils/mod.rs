mod prepare_env;

pub use prepare_env::{create_database, fund_wallet, prepare_test_env, random_db_path, run_migrations, seed_account};
