use super::print::{
    print_info, print_product, print_products, print_stats, print_success, print_warning,
};
use super::setup::{Cli, Commands, FormatArg, SearchBy};
use clap::Parser;
use directories::ProjectDirs;
use shopkeep::commands::export::ExportFormat;
use shopkeep::commands::NewProduct;
use shopkeep::config::ShopConfig;
use shopkeep::error::{Result, ShopError};
use shopkeep::events::LogObserver;
use shopkeep::logging;
use shopkeep::model::ProductUpdate;
use shopkeep::service::ProductService;
use shopkeep::store::repository::CsvRepository;
use shopkeep::validation::{
    validate_name, validate_price, validate_product_id, validate_quantity, Validation,
};
use std::path::PathBuf;
use std::rc::Rc;

const HOME_ENV: &str = "SHOPKEEP_HOME";

struct AppContext {
    service: ProductService<CsvRepository>,
    config: ShopConfig,
    home: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            name,
            category,
            price,
            quantity,
            supplier,
            id,
        }) => handle_add(&mut ctx, name, category, &price, &quantity, supplier, id),
        Some(Commands::List {
            low_stock,
            threshold,
        }) => handle_list(&ctx, low_stock, threshold),
        Some(Commands::View { id }) => handle_view(&ctx, &id),
        Some(Commands::Update {
            id,
            name,
            category,
            price,
            quantity,
            supplier,
        }) => {
            let update = parse_update(name, category, price, quantity, supplier)?;
            handle_update(&mut ctx, &id, update)
        }
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, &id),
        Some(Commands::Stock { id, delta }) => handle_stock(&mut ctx, &id, delta),
        Some(Commands::Search { term, by }) => handle_search(&ctx, &term, by),
        Some(Commands::Supplier { name }) => handle_supplier(&ctx, &name),
        Some(Commands::Stats { json }) => handle_stats(&ctx, json),
        Some(Commands::Export { format, output }) => handle_export(&ctx, format, output),
        None => handle_list(&ctx, false, None),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = resolve_home(cli)?;
    let config = ShopConfig::load(&home).unwrap_or_else(|e| {
        print_warning(&format!("Warning: ignoring unreadable config: {}", e));
        ShopConfig::default()
    });

    let data_path = match &cli.file {
        Some(path) => path.clone(),
        None => config.data_path(&home),
    };
    tracing::debug!(home = %home.display(), data = %data_path.display(), "opening shop");

    let mut service = ProductService::with_config(CsvRepository::open(data_path), &config);
    service.attach_observer(Rc::new(LogObserver));
    service.load()?;

    Ok(AppContext {
        service,
        config,
        home,
    })
}

fn resolve_home(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "shopkeep", "shopkeep")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ShopError::Store("Could not determine the shop home directory".into()))
}

/// Failed saves leave the change in memory; the process still exits cleanly.
fn persist(ctx: &AppContext) -> Result<()> {
    match ctx.service.save() {
        Ok(()) => Ok(()),
        Err(e) if e.is_storage() => {
            print_warning(&format!("Warning: changes were not saved: {}", e));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn checked<T>(validation: Validation<T>) -> Result<T> {
    validation.into_result().map_err(ShopError::InvalidField)
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    category: String,
    price: &str,
    quantity: &str,
    supplier: String,
    id: Option<String>,
) -> Result<()> {
    if let Some(id) = &id {
        checked(validate_product_id(id))?;
    }
    checked(validate_name(&name))?;
    let price = checked(validate_price(price))?;
    let quantity = checked(validate_quantity(quantity))?;

    let mut new = NewProduct::new(name, category, price, quantity).with_supplier(supplier);
    new.id = id;

    let product = ctx.service.create(new)?;
    print_success(&format!(
        "Product '{}' added with ID {}.",
        product.name(),
        product.id()
    ));
    persist(ctx)
}

fn handle_list(ctx: &AppContext, low_stock: bool, threshold: Option<i64>) -> Result<()> {
    let threshold = threshold.unwrap_or(ctx.service.low_stock_threshold());
    let products = if low_stock {
        ctx.service.low_stock_products(threshold)
    } else {
        ctx.service.get_all_products()
    };
    print_products(&products, threshold);
    Ok(())
}

fn handle_view(ctx: &AppContext, id: &str) -> Result<()> {
    let product = ctx
        .service
        .get_product(id)
        .ok_or_else(|| ShopError::ProductNotFound(id.to_string()))?;
    print_product(&product, ctx.service.low_stock_threshold());
    Ok(())
}

fn parse_update(
    name: Option<String>,
    category: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    supplier: Option<String>,
) -> Result<ProductUpdate> {
    let price = price.map(|p| checked(validate_price(&p))).transpose()?;
    let quantity = quantity
        .map(|q| checked(validate_quantity(&q)))
        .transpose()?;
    Ok(ProductUpdate {
        name,
        category,
        price,
        quantity,
        supplier,
    })
}

fn handle_update(ctx: &mut AppContext, id: &str, update: ProductUpdate) -> Result<()> {
    if update.is_empty() {
        print_info("Nothing to update.");
        return Ok(());
    }

    let report = ctx.service.update_product(id, &update)?;
    for (field, message) in &report.rejected {
        print_warning(&format!("Skipped {}: {}", field, message));
    }
    if report.changed() {
        print_success(&format!(
            "Product '{}' updated ({}).",
            report.product.id(),
            report.applied.join(", ")
        ));
        persist(ctx)?;
    }
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let removed = ctx.service.delete_product(id)?;
    print_success(&format!("Product '{}' deleted.", removed.name()));
    persist(ctx)
}

fn handle_stock(ctx: &mut AppContext, id: &str, delta: i64) -> Result<()> {
    let product = ctx.service.adjust_stock(id, delta)?;
    print_success(&format!(
        "Stock for '{}' is now {}.",
        product.name(),
        product.quantity()
    ));
    if product.is_low_stock(ctx.service.low_stock_threshold()) {
        print_warning(&format!("Warning: '{}' is low on stock.", product.name()));
    }
    persist(ctx)
}

fn handle_search(ctx: &AppContext, term: &str, by: SearchBy) -> Result<()> {
    let products = ctx.service.search(by.into(), term);
    print_products(&products, ctx.service.low_stock_threshold());
    Ok(())
}

fn handle_supplier(ctx: &AppContext, name: &str) -> Result<()> {
    let products = ctx.service.products_by_supplier(name);
    print_products(&products, ctx.service.low_stock_threshold());
    Ok(())
}

fn handle_stats(ctx: &AppContext, json: bool) -> Result<()> {
    let stats = ctx.service.get_statistics();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

fn handle_export(ctx: &AppContext, format: FormatArg, output: Option<PathBuf>) -> Result<()> {
    if ctx.service.total_count() == 0 {
        println!("No products to export.");
        return Ok(());
    }

    let format = ExportFormat::from(format);
    let path = output.unwrap_or_else(|| {
        let default = match format {
            ExportFormat::Json => &ctx.config.export_json,
            ExportFormat::Csv => &ctx.config.export_csv,
        };
        ctx.home.join(default)
    });

    let summary = ctx.service.export(format, &path)?;
    print_success(&format!(
        "Exported {} product(s) to {}.",
        summary.count,
        summary.path.display()
    ));
    Ok(())
}
