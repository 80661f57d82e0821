pub const CREATE_SENSOR_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL,
    location TEXT NOT NULL
);
"#;

pub const INSERT_READING: &str = r#"
INSERT INTO sensor_data (vehicle_id, timestamp, temperature, humidity, location)
VALUES (?, ?, ?, ?, ?);
"#;

pub const SELECT_ALL_READINGS: &str = r#"
SELECT vehicle_id, timestamp, temperature, humidity, location FROM sensor_data ORDER BY id;
"#;
