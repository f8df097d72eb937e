#![allow(dead_code)]

use std::collections::HashMap;

use parking_lot::Mutex;
use sqlkit::exec::{Connection, ExecResult, ResultSet, Row};
use sqlkit::{Result, SqlKitError};

// A two-database schema exercising keys, enums, defaults and ALTER
pub const SHOP_DDL: &str = "
CREATE DATABASE IF NOT EXISTS `shop` DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci;
USE `shop`;
-- users; semicolons in comments are not terminators
CREATE TABLE `user` (
  `id` bigint unsigned NOT NULL AUTO_INCREMENT COMMENT 'id',
  `name` varchar(64) NOT NULL DEFAULT '' COMMENT 'user name',
  `status` enum('1','2') NOT NULL DEFAULT '1' COMMENT 'status 1-Active,2-Inactive',
  `created_at` datetime NOT NULL DEFAULT CURRENT_TIMESTAMP,
  `updated_at` datetime NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_name` (`name`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='users';
CREATE TABLE `order_item` (
  `order_id` bigint unsigned NOT NULL,
  `item_id` bigint unsigned NOT NULL,
  `price` decimal(10,2) NOT NULL DEFAULT '0.00',
  `note` varchar(255) DEFAULT NULL,
  PRIMARY KEY (`order_id`, `item_id`)
) ENGINE=InnoDB COMMENT='order lines';
ALTER TABLE `order_item` ADD COLUMN `qty` int NOT NULL DEFAULT 1;
CREATE TABLE `crm`.`lead` (
  `id` int NOT NULL,
  `source` varchar(32) NOT NULL,
  PRIMARY KEY (`id`)
);
";

/// Connection serving canned result sets keyed by SQL text and recording
/// every statement it sees
#[derive(Default)]
pub struct FakeConnection {
    pub results: HashMap<String, Vec<ResultSet>>,
    pub exec_result: ExecResult,
    pub log: Mutex<Vec<String>>,
}

impl FakeConnection {
    pub fn new() -> Self {
        FakeConnection::default()
    }

    pub fn with_rows(mut self, sql: &str, rows: Vec<Row>) -> Self {
        self.results.insert(sql.to_string(), vec![rows]);
        self
    }

    pub fn with_sets(mut self, sql: &str, sets: Vec<ResultSet>) -> Self {
        self.results.insert(sql.to_string(), sets);
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl Connection for FakeConnection {
    fn query(&self, sql: &str) -> Result<Vec<ResultSet>> {
        self.log.lock().push(sql.to_string());
        self.results
            .get(sql)
            .cloned()
            .ok_or_else(|| SqlKitError::Connection(format!("unexpected query: {}", sql)))
    }

    fn exec(&self, sql: &str) -> Result<ExecResult> {
        self.log.lock().push(sql.to_string());
        Ok(self.exec_result)
    }
}

pub fn row(pairs: &[(&str, Option<&str>)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

/// Connection answering the introspection queries for database `shop`
pub fn shop_connection() -> FakeConnection {
    FakeConnection::new()
        .with_rows("SELECT DATABASE()", vec![row(&[("DATABASE()", Some("shop"))])])
        .with_rows(
            "SHOW TABLES",
            vec![
                row(&[("Tables_in_shop", Some("user"))]),
                row(&[("Tables_in_shop", Some("tag"))]),
            ],
        )
        .with_rows(
            "SHOW CREATE TABLE `shop`.`user`",
            vec![row(&[
                ("Table", Some("user")),
                (
                    "Create Table",
                    Some("CREATE TABLE `user` (\n  `id` int NOT NULL,\n  `name` varchar(32) NOT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"),
                ),
            ])],
        )
        .with_rows(
            "SHOW CREATE TABLE `shop`.`tag`",
            vec![row(&[
                ("Table", Some("tag")),
                (
                    "Create Table",
                    Some("CREATE TABLE `tag` (\n  `id` int NOT NULL,\n  `label` varchar(16) DEFAULT NULL,\n  PRIMARY KEY (`id`),\n  UNIQUE KEY `uk_label` (`label`)\n) ENGINE=InnoDB"),
                ),
            ])],
        )
}
