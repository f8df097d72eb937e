// Statement Replay
//
// Parses DDL text with the MySQL dialect and applies each statement to the
// catalog. Statements that do not change the schema are skipped.

use log::debug;
use sqlparser::ast::{
    AlterTableOperation, CreateTable, DataType, Ident, ObjectName, SchemaName, Statement, TableConstraint, Use,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::column::ColumnDef;
use super::error::{CatalogError, CatalogResult};
use super::table::{IndexKind, TableDef};
use super::Catalog;

/// Trailing options of CREATE DATABASE that can be dropped without changing
/// the schema
const DATABASE_OPTIONS: [&str; 5] = ["CHARACTER", "CHARSET", "DEFAULT", "COLLATE", "ENCRYPTION"];

/// Numeric types that take `UNSIGNED`/`ZEROFILL` in MySQL
const NUMERIC_TYPES: [&str; 13] = [
    "TINYINT", "SMALLINT", "MEDIUMINT", "INT", "INTEGER", "BIGINT", "DECIMAL", "DEC", "NUMERIC", "FIXED",
    "FLOAT", "DOUBLE", "REAL",
];

const TYPE_MODIFIERS: [&str; 3] = ["UNSIGNED", "SIGNED", "ZEROFILL"];

struct Parsed {
    statements: Vec<Statement>,
    /// Table comment recovered from stripped table options
    table_comment: Option<String>,
}

/// Type modifiers cut out of a column declaration, lower-cased
/// (`unsigned zerofill`)
#[derive(Debug, PartialEq)]
struct TypeModifier {
    statement: usize,
    column: String,
    text: String,
}

/// Statement text reshaped for the grammar, with what was cut out
struct Rewrite {
    sql: String,
    table_comment: Option<String>,
    modifiers: Vec<TypeModifier>,
}

impl Catalog {
    /// Replay DDL text. `sql` may hold several statements; they are applied
    /// in order and the first failure stops the replay.
    pub fn exec(&mut self, sql: &str) -> CatalogResult<()> {
        let parsed = parse(sql)?;
        for statement in &parsed.statements {
            self.apply(statement, parsed.table_comment.as_deref())?;
        }
        Ok(())
    }

    fn apply(&mut self, statement: &Statement, table_comment: Option<&str>) -> CatalogResult<()> {
        match statement {
            Statement::CreateDatabase {
                db_name,
                if_not_exists,
                ..
            } => self.create_database(&object_base(db_name), *if_not_exists),
            Statement::CreateSchema {
                schema_name,
                if_not_exists,
                ..
            } => self.create_database(&schema_base(schema_name), *if_not_exists),
            Statement::Use(target) => match target {
                Use::Object(name) | Use::Database(name) | Use::Schema(name) => {
                    self.use_database(&object_base(name))
                }
                other => {
                    debug!("replay: skipping {}", other);
                    Ok(())
                }
            },
            Statement::CreateTable(create) => self.create_table_from(create, table_comment),
            Statement::AlterTable {
                name, operations, ..
            } => self.alter_table(name, operations),
            Statement::Drop {
                object_type,
                if_exists,
                names,
                ..
            } => match object_type.to_string().as_str() {
                "TABLE" => {
                    for name in names {
                        let (db, table) = split_object_name(name);
                        let db_key = match self.resolve_database(db.as_deref()) {
                            Err(CatalogError::UnknownDatabase { .. }) if *if_exists => continue,
                            resolved => resolved?,
                        };
                        self.drop_table(&db_key, &table, *if_exists)?;
                    }
                    Ok(())
                }
                "DATABASE" | "SCHEMA" => {
                    for name in names {
                        self.drop_database(&object_base(name), *if_exists)?;
                    }
                    Ok(())
                }
                other => {
                    debug!("replay: skipping DROP {}", other);
                    Ok(())
                }
            },
            other => {
                debug!("replay: skipping non-DDL statement: {}", other);
                Ok(())
            }
        }
    }

    fn create_table_from(&mut self, create: &CreateTable, table_comment: Option<&str>) -> CatalogResult<()> {
        let (db, name) = split_object_name(&create.name);
        let db_key = self.resolve_database(db.as_deref())?;

        if let Some(source) = &create.like {
            let (source_db, source_name) = split_object_name(source);
            let source_key = self.resolve_database(source_db.as_deref())?;
            let mut table = self
                .table(&source_key, &source_name)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownTable {
                    name: source.to_string(),
                })?;
            table.name = name;
            return self.create_table(&db_key, table, create.if_not_exists);
        }

        let mut table = TableDef::new(name);
        table.comment = match table_comment {
            Some(comment) => comment.to_string(),
            None => create
                .comment
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default(),
        };

        // keys are registered once every column is known
        let mut keys: Vec<(IndexKind, Vec<String>)> = Vec::new();
        for def in &create.columns {
            let (column, inline_keys) = ColumnDef::from_ast(def);
            for kind in inline_keys {
                keys.push((kind, vec![column.name.clone()]));
            }
            table.add_column(column)?;
        }
        keys.extend(create.constraints.iter().filter_map(constraint_index));
        for (kind, columns) in keys {
            table.add_index(kind, columns)?;
        }

        self.create_table(&db_key, table, create.if_not_exists)
    }
}

fn parse(sql: &str) -> CatalogResult<Parsed> {
    let dialect = MySqlDialect {};
    let source = match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => {
            return Ok(Parsed {
                statements,
                table_comment: None,
            })
        }
        Err(source) => source,
    };

    // MySQL accepts table and database options in any order, and type
    // modifiers the grammar does not know; retry once with both cut out.
    let Some(rewrite) = rewrite_for_grammar(sql) else {
        return Err(CatalogError::Parse {
            sql: sql.to_string(),
            source,
        });
    };
    debug!("replay: retrying as: {}", rewrite.sql);
    match Parser::parse_sql(&dialect, &rewrite.sql) {
        Ok(mut statements) => {
            restore_type_modifiers(&mut statements, &rewrite.modifiers);
            Ok(Parsed {
                statements,
                table_comment: rewrite.table_comment,
            })
        }
        Err(_) => Err(CatalogError::Parse {
            sql: sql.to_string(),
            source,
        }),
    }
}

fn is_word(token: &Token, value: &str) -> bool {
    matches!(token, Token::Word(w) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(value))
}

/// Tokens come from an unescaping-off tokenizer, so literals render as
/// written.
fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.to_string()).collect()
}

fn rewrite_for_grammar(sql: &str) -> Option<Rewrite> {
    let tokens = Tokenizer::new(&MySqlDialect {}, sql)
        .with_unescape(false)
        .tokenize()
        .ok()?;
    let (tokens, modifiers) = strip_type_modifiers(tokens);
    let (kept, table_comment) = match strip_create_options(&tokens) {
        Some((end, comment)) => (&tokens[..end], comment),
        None if modifiers.is_empty() => return None,
        None => (&tokens[..], None),
    };
    Some(Rewrite {
        sql: render(kept),
        table_comment,
        modifiers,
    })
}

/// Drop `UNSIGNED`/`SIGNED`/`ZEROFILL` after numeric column types and
/// remember them per column.
fn strip_type_modifiers(tokens: Vec<Token>) -> (Vec<Token>, Vec<TypeModifier>) {
    let mut kept: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut modifiers: Vec<TypeModifier> = Vec::new();
    let mut statement = 0;

    for token in tokens {
        if token == Token::SemiColon {
            statement += 1;
        }
        if TYPE_MODIFIERS.iter().any(|m| is_word(&token, m)) {
            if let Some(column) = modified_column(&kept) {
                let text = token.to_string().to_lowercase();
                match modifiers.last_mut() {
                    Some(last) if last.statement == statement && last.column == column => {
                        last.text.push(' ');
                        last.text.push_str(&text);
                    }
                    _ => modifiers.push(TypeModifier {
                        statement,
                        column,
                        text,
                    }),
                }
                continue;
            }
        }
        kept.push(token);
    }
    (kept, modifiers)
}

/// Column whose numeric type ends `kept`: `<column> <type> [( ... )]`
fn modified_column(kept: &[Token]) -> Option<String> {
    let mut rev = kept.iter().rev().filter(|t| !matches!(t, Token::Whitespace(_)));
    let mut token = rev.next()?;
    if *token == Token::RParen {
        let mut depth = 1usize;
        while depth > 0 {
            token = rev.next()?;
            match token {
                Token::RParen => depth += 1,
                Token::LParen => depth -= 1,
                _ => {}
            }
        }
        token = rev.next()?;
    }
    if !NUMERIC_TYPES.iter().any(|ty| is_word(token, ty)) {
        return None;
    }
    match rev.next()? {
        Token::Word(word) => Some(word.value.clone()),
        _ => None,
    }
}

/// Put stripped modifiers back into the declared type of their column
fn restore_type_modifiers(statements: &mut [Statement], modifiers: &[TypeModifier]) {
    for modifier in modifiers {
        let Some(statement) = statements.get_mut(modifier.statement) else {
            continue;
        };
        let named = |ident: &Ident| ident.value.eq_ignore_ascii_case(&modifier.column);
        let target = match statement {
            Statement::CreateTable(create) => create
                .columns
                .iter_mut()
                .find(|c| named(&c.name))
                .map(|c| &mut c.data_type),
            Statement::AlterTable { operations, .. } => operations.iter_mut().find_map(|op| match op {
                AlterTableOperation::AddColumn { column_def, .. } if named(&column_def.name) => {
                    Some(&mut column_def.data_type)
                }
                AlterTableOperation::ChangeColumn {
                    new_name, data_type, ..
                } if named(new_name) => Some(data_type),
                AlterTableOperation::ModifyColumn {
                    col_name, data_type, ..
                } if named(col_name) => Some(data_type),
                _ => None,
            }),
            _ => None,
        };
        if let Some(data_type) = target {
            let declared = format!("{} {}", data_type, modifier.text);
            *data_type = DataType::Custom(ObjectName(vec![Ident::new(declared)]), Vec::new());
        }
    }
}

/// Decode a raw single-quoted literal body
fn unescape_literal(raw: &str) -> Option<String> {
    let quoted = format!("'{}'", raw);
    match Tokenizer::new(&MySqlDialect {}, &quoted).tokenize().ok()?.into_iter().next() {
        Some(Token::SingleQuotedString(s)) => Some(s),
        _ => None,
    }
}

/// Find where the trailing options of a CREATE TABLE / CREATE DATABASE
/// statement begin. Returns the number of tokens to keep and the table
/// comment found among the options, or `None` when the tokens are not such
/// a statement.
fn strip_create_options(tokens: &[Token]) -> Option<(usize, Option<String>)> {
    let significant: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !matches!(t, Token::Whitespace(_)))
        .map(|(i, _)| i)
        .collect();

    let first = significant.first().map(|&i| &tokens[i])?;
    if !is_word(first, "CREATE") {
        return None;
    }
    let object = significant[1..]
        .iter()
        .map(|&i| &tokens[i])
        .find(|t| !is_word(t, "TEMPORARY"))?;

    if is_word(object, "TABLE") {
        let mut depth = 0usize;
        let mut end = None;
        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end?;
        let tail: Vec<&Token> = tokens[end + 1..]
            .iter()
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::Eq))
            .collect();
        let comment = tail
            .windows(2)
            .find(|pair| is_word(pair[0], "COMMENT"))
            .and_then(|pair| match pair[1] {
                Token::SingleQuotedString(s) => unescape_literal(s),
                _ => None,
            });
        return Some((end + 1, comment));
    }

    if is_word(object, "DATABASE") || is_word(object, "SCHEMA") {
        let cut = significant
            .iter()
            .copied()
            .find(|&i| DATABASE_OPTIONS.iter().any(|opt| is_word(&tokens[i], opt)))?;
        return Some((cut, None));
    }

    None
}

/// Split a possibly qualified name into `(db, table)`
pub(super) fn split_object_name(name: &ObjectName) -> (Option<String>, String) {
    match name.0.as_slice() {
        [] => (None, String::new()),
        [table] => (None, table.value.clone()),
        [.., db, table] => (Some(db.value.clone()), table.value.clone()),
    }
}

fn object_base(name: &ObjectName) -> String {
    name.0.last().map(|i| i.value.clone()).unwrap_or_default()
}

fn schema_base(name: &SchemaName) -> String {
    match name {
        SchemaName::Simple(name) => object_base(name),
        other => other.to_string().replace('`', ""),
    }
}

/// Index described by a table-level constraint; foreign keys and checks
/// carry no index of interest.
pub(super) fn constraint_index(constraint: &TableConstraint) -> Option<(IndexKind, Vec<String>)> {
    let (kind, columns) = match constraint {
        TableConstraint::PrimaryKey { columns, .. } => (IndexKind::Primary, columns),
        TableConstraint::Unique { columns, .. } => (IndexKind::Unique, columns),
        TableConstraint::Index { columns, .. } => (IndexKind::Index, columns),
        _ => return None,
    };
    Some((kind, columns.iter().map(|c| c.value.clone()).collect()))
}
