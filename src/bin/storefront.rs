//! CLI front-end for browsing the storefront catalog and managing the cart.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use storefront_rs::catalog::{Browse, DEFAULT_THRESHOLD_KM, LocatedCatalog, OfferItem, Offers};
use storefront_rs::models::{
    Cart, CatalogEntry, CategorySelection, EntryId, LocatedEntry, Location, MenuItemId, Order,
};
use storefront_rs::registration::RestaurantRegistration;
use storefront_rs::storage::{BlockingRepository, FileStorage};
use storefront_rs::storefront::StorefrontBlocking;

/// Placeholder for missing values in tables.
const DASH: &str = "\u{2014}";

/// Storefront CLI: browse nearby restaurants and stores, manage the cart.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR", env = "STOREFRONT_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Distance in kilometers beyond which an entry counts as far.
    #[arg(
        long,
        global = true,
        value_name = "KM",
        env = "STOREFRONT_THRESHOLD_KM",
        default_value_t = DEFAULT_THRESHOLD_KM
    )]
    threshold_km: f64,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the catalog by category, hiding far entries unless searching.
    Browse(QueryArgs),
    /// List discounted menu items.
    Offers(QueryArgs),
    /// Show one catalog entry with its menu.
    Show {
        /// Catalog entry id.
        id: EntryId,
    },
    /// Set, clear or print the current location.
    Locate(LocateArgs),
    /// Register a restaurant from a JSON draft, or replace one with --replace.
    Register {
        /// Path to the registration JSON.
        file: PathBuf,
        /// Id of a user-submitted entry to replace.
        #[arg(long, value_name = "ID")]
        replace: Option<EntryId>,
    },
    /// Delete a user-submitted restaurant.
    Remove {
        /// Catalog entry id.
        id: EntryId,
    },
    /// List the cart.
    Cart,
    /// Add a menu item to the cart.
    CartAdd {
        /// Catalog entry id.
        entry: EntryId,
        /// Menu item id within the entry.
        item: MenuItemId,
    },
    /// Remove the cart line at a position (0-based).
    CartRemove {
        /// Cart line index.
        index: usize,
    },
    /// Empty the cart.
    CartClear,
    /// Place an order with the current cart.
    Checkout,
    /// List past orders.
    Orders,
}

/// Arguments shared by `browse` and `offers`.
#[derive(Debug, Args)]
struct QueryArgs {
    /// Category tag, `All` for every category, or empty for none.
    #[arg(long, default_value = "All")]
    category: CategorySelection,
    /// Case-insensitive search across names and menu items.
    #[arg(long, default_value = "")]
    search: String,
}

/// Arguments for the `locate` subcommand.
#[derive(Debug, Args)]
struct LocateArgs {
    /// Latitude in degrees. Requires --lon.
    #[arg(long, requires = "lon", conflicts_with = "clear", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude in degrees. Requires --lat.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Forget the cached location.
    #[arg(long)]
    clear: bool,
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => return report("failed to initialize storage", &err),
    };

    let store = match StorefrontBlocking::builder()
        .storage(storage)
        .threshold_km(cli.threshold_km)
        .build()
    {
        Ok(store) => store,
        Err(err) => return report("failed to build storefront", &err),
    };

    if let Err(err) = store.restore_location() {
        return report("failed to read cached location", &err);
    }

    dispatch(&store, cli.command)
}

/// Creates the storage backend, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> storefront_rs::Result<FileStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };
    FileStorage::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Browse(args) => cmd_browse(store, &args),
        Command::Offers(args) => cmd_offers(store, &args),
        Command::Show { id } => cmd_show(store, id),
        Command::Locate(args) => cmd_locate(store, &args),
        Command::Register { file, replace } => cmd_register(store, &file, replace),
        Command::Remove { id } => cmd_remove(store, id),
        Command::Cart => cmd_cart(store),
        Command::CartAdd { entry, item } => cmd_cart_add(store, entry, item),
        Command::CartRemove { index } => cmd_cart_remove(store, index),
        Command::CartClear => cmd_cart_clear(store),
        Command::Checkout => cmd_checkout(store),
        Command::Orders => cmd_orders(store),
    }
}

/// Writes an error line to stderr and returns the failure exit code.
fn report<E: core::fmt::Display>(context: &str, err: &E) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Executes the `browse` subcommand.
fn cmd_browse<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    args: &QueryArgs,
) -> io::Result<ExitCode> {
    match store.located_catalog() {
        Ok(catalog) => {
            print_browse(&catalog, catalog.browse(&args.category, &args.search))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load catalog", &err),
    }
}

/// Executes the `offers` subcommand.
fn cmd_offers<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    args: &QueryArgs,
) -> io::Result<ExitCode> {
    match store.located_catalog() {
        Ok(catalog) => {
            print_offers(catalog.offers(&args.category, &args.search))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load catalog", &err),
    }
}

/// Executes the `show` subcommand.
fn cmd_show<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    id: EntryId,
) -> io::Result<ExitCode> {
    match store.restaurant(id) {
        Ok(entry) => {
            print_entry(&entry, store.current_location())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to show entry", &err),
    }
}

/// Executes the `locate` subcommand.
fn cmd_locate<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    args: &LocateArgs,
) -> io::Result<ExitCode> {
    if args.clear {
        if let Err(err) = store.clear_location() {
            return report("failed to clear location", &err);
        }
        writeln!(io::stdout().lock(), "{}", "Location cleared.".green())?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some((lat, lon)) = args.lat.zip(args.lon) else {
        let mut out = io::stdout().lock();
        match store.current_location() {
            Some(here) => writeln!(out, "{} {here}", "Current location:".bold())?,
            None => writeln!(out, "{}", "Location unknown.".dimmed())?,
        }
        return Ok(ExitCode::SUCCESS);
    };

    let Some(here) = Location::new(lat, lon) else {
        return report("invalid location", &format_args!("{lat}, {lon}"));
    };
    match store.set_location(here) {
        Ok(()) => {
            writeln!(
                io::stdout().lock(),
                "{} {here}",
                "Location set to".green()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to set location", &err),
    }
}

/// Executes the `register` subcommand.
fn cmd_register<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    file: &Path,
    replace: Option<EntryId>,
) -> io::Result<ExitCode> {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(err) => return report(&format!("failed to read {}", file.display()), &err),
    };
    let draft: RestaurantRegistration = match serde_json::from_str(&raw) {
        Ok(draft) => draft,
        Err(err) => return report("malformed registration", &err),
    };

    let result = match replace {
        Some(id) => store.update_restaurant(id, draft),
        None => store.register_restaurant(draft),
    };
    match result {
        Ok(entry) => {
            let verb = if replace.is_some() { "Updated" } else { "Registered" };
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                verb.green().bold(),
                entry.name.bold(),
                format_args!("(id {}, {} menu items)", entry.id, entry.menu.len()).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("registration failed", &err),
    }
}

/// Executes the `remove` subcommand.
fn cmd_remove<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    id: EntryId,
) -> io::Result<ExitCode> {
    match store.remove_restaurant(id) {
        Ok(true) => {
            writeln!(io::stdout().lock(), "{} {id}", "Removed".green())?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => report(
            "nothing removed",
            &format_args!("no user-submitted entry with id {id}"),
        ),
        Err(err) => report("failed to remove entry", &err),
    }
}

/// Executes the `cart` subcommand.
fn cmd_cart<S: BlockingRepository>(store: &StorefrontBlocking<S>) -> io::Result<ExitCode> {
    match store.cart() {
        Ok(cart) => {
            print_cart(&cart)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to read cart", &err),
    }
}

/// Executes the `cart-add` subcommand.
fn cmd_cart_add<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    entry: EntryId,
    item: MenuItemId,
) -> io::Result<ExitCode> {
    match store.add_to_cart(entry, item) {
        Ok(line) => {
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                "Added".green(),
                line.item.name.bold(),
                format_args!("from {}", line.restaurant_name).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to add to cart", &err),
    }
}

/// Executes the `cart-remove` subcommand.
fn cmd_cart_remove<S: BlockingRepository>(
    store: &StorefrontBlocking<S>,
    index: usize,
) -> io::Result<ExitCode> {
    match store.remove_from_cart(index) {
        Ok(Some(line)) => {
            writeln!(io::stdout().lock(), "{} {}", "Removed".green(), line.item.name)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => report("nothing removed", &format_args!("no cart line at {index}")),
        Err(err) => report("failed to update cart", &err),
    }
}

/// Executes the `cart-clear` subcommand.
fn cmd_cart_clear<S: BlockingRepository>(store: &StorefrontBlocking<S>) -> io::Result<ExitCode> {
    match store.clear_cart() {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Cart cleared.".green())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to clear cart", &err),
    }
}

/// Executes the `checkout` subcommand.
fn cmd_checkout<S: BlockingRepository>(store: &StorefrontBlocking<S>) -> io::Result<ExitCode> {
    match store.checkout() {
        Ok(Some(order)) => {
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "{} {} items, total {:.2}",
                "Order placed:".green().bold(),
                order.items.len(),
                order.total
            )?;
            let saved = order.savings();
            if saved > 0.0_f64 {
                writeln!(out, "  {} {saved:.2}", "You saved".cyan())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            writeln!(io::stdout().lock(), "{}", "Cart is empty.".dimmed())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("checkout failed", &err),
    }
}

/// Executes the `orders` subcommand.
fn cmd_orders<S: BlockingRepository>(store: &StorefrontBlocking<S>) -> io::Result<ExitCode> {
    match store.orders() {
        Ok(orders) => {
            print_orders(&orders)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to read orders", &err),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Creates a table with the shared preset and a cyan header row.
fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(headers.iter().map(|header| Cell::new(header).fg(Color::Cyan)));
    table
}

/// Formats a price with two decimals.
fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Distance from `here` to `entry`, or a dash when either is unknown.
fn distance_text(entry: &CatalogEntry, here: Option<Location>) -> String {
    here.zip(entry.coordinates()).map_or_else(
        || DASH.to_owned(),
        |(from, to)| format!("{:.1} km", from.distance_km(&to)),
    )
}

/// Prints a section heading with an item count.
fn write_heading<W: io::Write>(out: &mut W, title: &str, count: usize) -> io::Result<()> {
    writeln!(out, "{} {}", title.green().bold(), format_args!("({count})").dimmed())?;
    writeln!(out)
}

/// Builds the table of catalog entries.
fn entries_table(entries: &[&LocatedEntry], here: Option<Location>) -> Table {
    let mut table = new_table(&["ID", "Name", "Cuisine", "Delivery", "From", "Distance"]);
    for entry in entries {
        let distance = Cell::new(distance_text(entry, here));
        _ = table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(&entry.name),
            Cell::new(&entry.cuisine),
            Cell::new(format!("{:.0} min", entry.delivery_time)),
            Cell::new(money(entry.price)),
            if entry.is_far {
                distance.fg(Color::DarkGrey)
            } else {
                distance.fg(Color::Green)
            },
        ]);
    }
    table
}

/// Prints a browse result.
fn print_browse(catalog: &LocatedCatalog, view: Browse<'_>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if catalog.location().is_none() {
        writeln!(
            out,
            "{} location unknown, only search results are shown (set one with `storefront locate`)",
            "hint:".cyan()
        )?;
    }
    match view {
        Browse::NoCategory => {
            writeln!(out, "{}", "Select a category to browse.".dimmed())?;
        }
        Browse::Grouped(groups) => {
            if groups.is_empty() {
                writeln!(out, "{}", "Nothing nearby.".dimmed())?;
            }
            for group in groups {
                write_heading(&mut out, &group.label, group.items.len())?;
                writeln!(out, "{}", entries_table(&group.items, catalog.location()))?;
            }
        }
        Browse::Filtered(entries) => {
            if entries.is_empty() {
                writeln!(out, "{}", "Nothing nearby in this category.".dimmed())?;
                return Ok(());
            }
            write_heading(&mut out, "Results", entries.len())?;
            writeln!(out, "{}", entries_table(&entries, catalog.location()))?;
        }
    }
    Ok(())
}

/// Builds the table of offered items.
fn offers_table(items: &[OfferItem<'_>]) -> Table {
    let mut table = new_table(&["Restaurant", "Entry", "Item", "ID", "Price", "Offer", "Save"]);
    for offer in items {
        let savings = offer.item.savings().unwrap_or_default();
        _ = table.add_row(vec![
            Cell::new(&offer.restaurant.name),
            Cell::new(offer.restaurant.id),
            Cell::new(&offer.item.name),
            Cell::new(offer.item.id),
            Cell::new(money(offer.item.price)).fg(Color::DarkGrey),
            Cell::new(money(offer.item.effective_price())).fg(Color::Green),
            Cell::new(money(savings)),
        ]);
    }
    table
}

/// Prints an offers result.
fn print_offers(view: Offers<'_>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match view {
        Offers::NoCategory => {
            writeln!(out, "{}", "Select a category to see offers.".dimmed())?;
        }
        Offers::Grouped(groups) => {
            if groups.is_empty() {
                writeln!(out, "{}", "No offers found.".dimmed())?;
            }
            for group in groups {
                write_heading(&mut out, &group.label, group.items.len())?;
                writeln!(out, "{}", offers_table(&group.items))?;
            }
        }
        Offers::Filtered(items) => {
            if items.is_empty() {
                writeln!(out, "{}", "No offers found.".dimmed())?;
                return Ok(());
            }
            write_heading(&mut out, "Offers", items.len())?;
            writeln!(out, "{}", offers_table(&items))?;
        }
    }
    Ok(())
}

/// Prints one catalog entry with its menu.
fn print_entry(entry: &LocatedEntry, here: Option<Location>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        entry.name.green().bold(),
        format_args!("#{}", entry.id).dimmed()
    )?;
    writeln!(out, "  {} {}", "Category:".bold(), entry.category_label())?;
    if !entry.cuisine.is_empty() {
        writeln!(out, "  {} {}", "Cuisine:".bold(), entry.cuisine)?;
    }
    if !entry.address.is_empty() {
        writeln!(out, "  {} {}", "Address:".bold(), entry.address)?;
    }
    if let Some(place) = entry.location_name.as_deref() {
        writeln!(out, "  {} {place}", "Location:".bold())?;
    }
    writeln!(out, "  {} {:.0} min", "Delivery:".bold(), entry.delivery_time)?;
    let distance = distance_text(entry, here);
    if entry.is_far {
        writeln!(out, "  {} {distance} {}", "Distance:".bold(), "(far)".red())?;
    } else {
        writeln!(out, "  {} {distance}", "Distance:".bold())?;
    }
    writeln!(out)?;

    if entry.menu.is_empty() {
        writeln!(out, "{}", "No menu items.".dimmed())?;
        return Ok(());
    }
    let mut table = new_table(&["ID", "Item", "Price", "Offer"]);
    for item in &entry.menu {
        let offer = item.offer_price.map_or_else(
            || Cell::new(DASH).fg(Color::DarkGrey),
            |offer| Cell::new(money(offer)).fg(Color::Green),
        );
        _ = table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.name),
            Cell::new(money(item.price)),
            offer,
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the cart.
fn print_cart(cart: &Cart) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if cart.is_empty() {
        writeln!(out, "{}", "Cart is empty.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["#", "Restaurant", "Item", "Price"]);
    for (index, line) in cart.items().iter().enumerate() {
        _ = table.add_row(vec![
            Cell::new(index),
            Cell::new(&line.restaurant_name),
            Cell::new(&line.item.name),
            Cell::new(money(line.item.effective_price())),
        ]);
    }

    write_heading(&mut out, "Cart", cart.len())?;
    writeln!(out, "{table}")?;
    writeln!(out, "{} {}", "Total:".bold(), money(cart.total()))?;
    Ok(())
}

/// Prints the order history.
fn print_orders(orders: &[Order]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if orders.is_empty() {
        writeln!(out, "{}", "No orders yet.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["Placed", "Items", "Total", "Saved"]);
    for order in orders {
        _ = table.add_row(vec![
            Cell::new(order.placed_at.format("%Y-%m-%d %H:%M")),
            Cell::new(order.items.len()),
            Cell::new(money(order.total)),
            Cell::new(money(order.savings())).fg(Color::Green),
        ]);
    }

    write_heading(&mut out, "Orders", orders.len())?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr may be the thing that failed; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storefront_rs::storage::InMemoryStorage;

    /// Creates a storefront over the bundled catalog, located in Bandra.
    fn mock_store() -> StorefrontBlocking<InMemoryStorage> {
        let store = StorefrontBlocking::builder()
            .storage(InMemoryStorage::new())
            .build()
            .unwrap();
        store
            .set_location(Location::new(19.0596, 72.8295).unwrap())
            .unwrap();
        store
    }

    fn query(category: &str, search: &str) -> QueryArgs {
        QueryArgs {
            category: CategorySelection::parse(category),
            search: search.to_owned(),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--threshold-km",
            "2.5",
            "browse",
            "--category",
            "Groceries",
        ])
        .unwrap();
        assert!((cli.threshold_km - 2.5).abs() < f64::EPSILON);
        let Command::Browse(args) = cli.command else {
            unreachable!("expected browse");
        };
        assert_eq!(args.category, CategorySelection::Tag("Groceries".to_owned()));
        assert!(args.search.is_empty());
    }

    #[test]
    fn cli_locate_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["storefront", "locate", "--lat", "19.0"]).is_err());
        assert!(
            Cli::try_parse_from(["storefront", "locate", "--lat", "-33.9", "--lon", "18.4"])
                .is_ok()
        );
    }

    #[test]
    fn dispatch_browse_and_offers() {
        let store = mock_store();
        for args in [query("All", ""), query("Restaurants", "pizza"), query("", "")] {
            assert_eq!(dispatch(&store, Command::Browse(args)).unwrap(), ExitCode::SUCCESS);
        }
        let code = dispatch(&store, Command::Offers(query("All", ""))).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn dispatch_show() {
        let store = mock_store();
        let code = dispatch(&store, Command::Show { id: EntryId::new(1) }).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let code = dispatch(&store, Command::Show { id: EntryId::new(999) }).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn dispatch_locate() {
        let store = mock_store();
        let set = LocateArgs {
            lat: Some(28.6315),
            lon: Some(77.2167),
            clear: false,
        };
        assert_eq!(dispatch(&store, Command::Locate(set)).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            store.current_location(),
            Some(Location::new(28.6315, 77.2167).unwrap())
        );

        let invalid = LocateArgs {
            lat: Some(95.0),
            lon: Some(0.0),
            clear: false,
        };
        assert_eq!(dispatch(&store, Command::Locate(invalid)).unwrap(), ExitCode::FAILURE);

        let clear = LocateArgs {
            lat: None,
            lon: None,
            clear: true,
        };
        assert_eq!(dispatch(&store, Command::Locate(clear)).unwrap(), ExitCode::SUCCESS);
        assert!(store.current_location().is_none());
    }

    #[test]
    fn dispatch_register_and_remove() {
        let store = mock_store();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("draft.json");
        std::fs::write(
            &file,
            r#"{"name":"Chai Point","category":"Restaurants","lat":19.06,"long":72.83,
                "menu":[{"name":"Masala Chai","price":30,"offerPrice":25}]}"#,
        )
        .unwrap();

        let code = dispatch(
            &store,
            Command::Register {
                file: file.clone(),
                replace: None,
            },
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let id = store.user_entries().unwrap()[0].id;

        let code = dispatch(
            &store,
            Command::Register {
                file,
                replace: Some(EntryId::new(1)),
            },
        )
        .unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        assert_eq!(dispatch(&store, Command::Remove { id }).unwrap(), ExitCode::SUCCESS);
        assert_eq!(dispatch(&store, Command::Remove { id }).unwrap(), ExitCode::FAILURE);

        let missing = dir.path().join("missing.json");
        let code = dispatch(
            &store,
            Command::Register {
                file: missing,
                replace: None,
            },
        )
        .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn dispatch_cart_flow() {
        let store = mock_store();
        assert_eq!(dispatch(&store, Command::Checkout).unwrap(), ExitCode::SUCCESS);
        assert!(store.orders().unwrap().is_empty());

        let add = Command::CartAdd {
            entry: EntryId::new(1),
            item: MenuItemId::new(1),
        };
        assert_eq!(dispatch(&store, add).unwrap(), ExitCode::SUCCESS);
        let bad = Command::CartAdd {
            entry: EntryId::new(1),
            item: MenuItemId::new(999),
        };
        assert_eq!(dispatch(&store, bad).unwrap(), ExitCode::FAILURE);

        assert_eq!(dispatch(&store, Command::Cart).unwrap(), ExitCode::SUCCESS);
        let code = dispatch(&store, Command::CartRemove { index: 5 }).unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        assert_eq!(dispatch(&store, Command::Checkout).unwrap(), ExitCode::SUCCESS);
        assert_eq!(store.orders().unwrap().len(), 1);
        assert!(store.cart().unwrap().is_empty());
        assert_eq!(dispatch(&store, Command::Orders).unwrap(), ExitCode::SUCCESS);
        assert_eq!(dispatch(&store, Command::CartClear).unwrap(), ExitCode::SUCCESS);
    }
}
