use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tokens (
            address TEXT PRIMARY KEY,
            symbol TEXT NOT NULL,
            decimals INTEGER NOT NULL,
            is_wrapped INTEGER NOT NULL DEFAULT 0,
            fee_tier INTEGER,
            price_usd REAL,
            fdv_usd REAL,
            market_cap_usd REAL,
            volume_24h_usd REAL,
            total_supply REAL,
            market_updated_at TEXT
        );

        CREATE TABLE IF NOT EXISTS plans (
            id TEXT PRIMARY KEY,
            user_wallet TEXT NOT NULL,
            recipient TEXT NOT NULL,
            token_out TEXT NOT NULL REFERENCES tokens(address),
            amount_in TEXT NOT NULL,
            frequency INTEGER NOT NULL,
            last_executed_at INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            auth_kind TEXT NOT NULL,
            ledger_plan_id INTEGER,
            approval_amount TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS executions (
            tx_hash TEXT PRIMARY KEY,
            plan_id TEXT NOT NULL REFERENCES plans(id),
            amount_in TEXT NOT NULL,
            amount_out TEXT NOT NULL,
            fee_amount TEXT NOT NULL,
            token_out TEXT NOT NULL,
            decoded INTEGER NOT NULL DEFAULT 1,
            executed_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            wallet TEXT PRIMARY KEY,
            fid INTEGER
        );

        CREATE TABLE IF NOT EXISTS portfolio_daily (
            user_wallet TEXT NOT NULL,
            date TEXT NOT NULL,
            invested_usd REAL NOT NULL,
            current_value_usd REAL NOT NULL,
            percent_change REAL NOT NULL,
            PRIMARY KEY (user_wallet, date)
        );

        CREATE INDEX IF NOT EXISTS idx_plans_active ON plans(active);
        CREATE INDEX IF NOT EXISTS idx_plans_user ON plans(user_wallet);
        CREATE INDEX IF NOT EXISTS idx_executions_plan ON executions(plan_id);
        "
    ).map_err(|e| format!("Migration failed: {e}"))
}
