use super::types::Args;

impl Args {
    /// Checks the settings clap can't check on its own.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database name is blank or the port is 0
    pub fn validate(&mut self) -> Result<(), String> {
        self.db_name = self.db_name.trim().to_string();
        if self.db_name.is_empty() {
            return Err("Database name is required".to_string());
        }
        if self.port == 0 {
            return Err("Port must be between 1 and 65535".to_string());
        }
        Ok(())
    }
}
