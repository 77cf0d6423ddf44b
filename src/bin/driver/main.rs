mod args;
mod driver_error;

use std::fs;

use anyhow::Result;
use clap::Parser;

use args::Args;
use driver_error::DriverError;
use nljc::*;

#[cfg(feature = "semantic_analysis")]
fn validate(ast: &ast::Ast) -> Result<table::SymbolTable, DriverError> {
    let (table, mut reports) = table::build(ast);
    reports.extend(semantic_analysis::analyze(ast, &table));
    for report in &reports {
        eprintln!("{report}");
    }
    if reports.is_empty() {
        Ok(table)
    } else {
        Err(DriverError::SemanticErrors(reports.len()))
    }
}

#[cfg(feature = "optimizer")]
fn optimize(ast: &mut ast::Ast, config: &config::Config) {
    if config.optimize {
        optimizer::optimize(ast);
    }
}

#[cfg(feature = "ollir")]
fn lower(ast: &ast::Ast, table: &table::SymbolTable, args: &Args) -> ollir::OClass {
    let class = ollir::lower(ast, table);
    if args.ollir {
        println!("{class}");
    }
    class
}

#[cfg(feature = "emission")]
fn emit(class: &ollir::OClass, config: &config::Config, args: &Args) -> Result<(), DriverError> {
    let mode = regalloc::AllocMode::from_request(config.max_registers);
    let generated = codegen::generate(class, mode);
    fs::write(args.input.with_extension("j"), generated.to_string())?;
    Ok(())
}

#[allow(unused_variables, unused_mut)]
fn run(args: &Args) -> Result<(), DriverError> {
    if !args.input.exists() {
        return Err(DriverError::InputFileDoesNotExist(
            args.input.display().to_string(),
        ));
    }
    let source = fs::read_to_string(&args.input)?;
    let mut ast = input::parse(&source)?;
    let config = config::Config::new(args.optimize, args.registers);

    #[cfg(feature = "semantic_analysis")]
    let table = validate(&ast)?;

    if args.validate {
        return Ok(());
    }

    #[cfg(feature = "optimizer")]
    optimize(&mut ast, &config);

    #[cfg(feature = "ollir")]
    let class = lower(&ast, &table, args);

    if args.ollir {
        return Ok(());
    }

    #[cfg(feature = "emission")]
    emit(&class, &config, args)?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
