//constants

const INSERT_DRIFT_RECORD: &str = include_str!("scripts/insert_drift_record.sql");
const DATABASE_EXISTS: &str = include_str!("scripts/database_exists.sql");

pub enum Queries {
    InsertDriftRecord,
    DatabaseExists,
}

impl Queries {
    pub fn get_query(&self) -> SqlQuery {
        match self {
            Queries::InsertDriftRecord => SqlQuery::new(INSERT_DRIFT_RECORD),
            Queries::DatabaseExists => SqlQuery::new(DATABASE_EXISTS),
        }
    }
}

pub struct SqlQuery {
    pub sql: String,
}

impl SqlQuery {
    fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
        }
    }
}
