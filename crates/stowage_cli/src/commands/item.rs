//! `stowage item` command - item lifecycle and browsing

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use stowage_core::{
    parse_price, BrowseSession, Condition, FilterState, Item, ItemEdit, ItemId, MasterId,
    MasterKind, MasterRecord, SortOption,
};

use crate::context::{CliItemService, CliMasterService, Context};
use crate::helpers::{
    format_timestamp, none_if_blank, parse_date, report, resolve_item, resolve_master, short_id,
};

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Create an item ("New Item" unless --name is given)
    Add(AddArgs),

    /// Show one item's details
    Show(ShowArgs),

    /// Change item fields
    Edit(EditArgs),

    /// Delete one or more items
    Delete(DeleteArgs),

    /// List items with filtering and sorting
    List(ListArgs),
}

/// Sort order for item lists
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    UpdatedDesc,
    CreatedDesc,
    NameAsc,
    NameDesc,
}

impl From<SortArg> for SortOption {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::UpdatedDesc => SortOption::UpdatedDesc,
            SortArg::CreatedDesc => SortOption::CreatedDesc,
            SortArg::NameAsc => SortOption::NameAsc,
            SortArg::NameDesc => SortOption::NameDesc,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConditionArg {
    BrandNew,
    Good,
    Normal,
    Deteriorated,
    Broken,
}

impl From<ConditionArg> for Condition {
    fn from(value: ConditionArg) -> Self {
        match value {
            ConditionArg::BrandNew => Condition::BrandNew,
            ConditionArg::Good => Condition::Good,
            ConditionArg::Normal => Condition::Normal,
            ConditionArg::Deteriorated => Condition::Deteriorated,
            ConditionArg::Broken => Condition::Broken,
        }
    }
}

/// Filter and sort options shared by `list` and `delete`
#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// Case-insensitive text search over names, notes, details and tags
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only items in this category (name or id)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only items at this location (name or id)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Include disposed items
    #[arg(long, short = 'a')]
    pub include_disposed: bool,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::UpdatedDesc)]
    pub sort: SortArg,
}

/// Item fields settable on add and edit. An empty value clears the field.
#[derive(clap::Args, Debug, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model_number: Option<String>,
    #[arg(long)]
    pub serial_number: Option<String>,
    /// Purchase date as YYYY-MM-DD
    #[arg(long)]
    pub purchase_date: Option<String>,
    #[arg(long)]
    pub purchase_store: Option<String>,
    /// Purchase price; unparseable input clears the price
    #[arg(long)]
    pub price: Option<String>,
    /// Warranty expiration as YYYY-MM-DD
    #[arg(long)]
    pub warranty: Option<String>,
    #[arg(long)]
    pub dimensions: Option<String>,
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long, value_enum)]
    pub condition: Option<ConditionArg>,
    #[arg(long)]
    pub accessories: Option<String>,
    #[arg(long)]
    pub consumable: Option<String>,
    #[arg(long)]
    pub link: Option<String>,
    /// Tag to assign (name or id); repeatable
    #[arg(long = "tag")]
    pub add_tags: Vec<String>,
    /// Tag to remove (name or id); repeatable
    #[arg(long = "untag")]
    pub remove_tags: Vec<String>,
    /// Mark as disposed (true) or back in use (false)
    #[arg(long)]
    pub disposed: Option<bool>,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Category for the new item (default: first category by name; empty
    /// leaves it unset)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Location for the new item (default: first location by name; empty
    /// leaves it unset)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Item id or id prefix
    pub item: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Item id or id prefix
    pub item: String,

    /// Category (name or id); empty clears it
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Location (name or id); empty clears it
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Item ids or id prefixes
    #[arg(required = true)]
    pub items: Vec<String>,

    /// The list the items were picked from; decides the next selection
    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(cmd: ItemCommands, ctx: &Context) -> Result<()> {
    let items = ctx.items()?;
    let masters = ctx.masters()?;
    let lookup = MasterLookup::load(&masters)?;

    match cmd {
        ItemCommands::Add(args) => run_add(args, &items, &lookup),
        ItemCommands::Show(args) => run_show(args, &items, &lookup),
        ItemCommands::Edit(args) => run_edit(args, &items, &lookup),
        ItemCommands::Delete(args) => run_delete(args, &items, &lookup),
        ItemCommands::List(args) => run_list(args, &items, &lookup),
    }
}

/// Display-ordered master records of every kind, loaded once per command.
struct MasterLookup {
    by_kind: HashMap<MasterKind, Vec<MasterRecord>>,
}

impl MasterLookup {
    fn load(service: &CliMasterService<'_>) -> Result<Self> {
        let mut by_kind = HashMap::new();
        for kind in MasterKind::ALL {
            by_kind.insert(kind, service.list(kind).map_err(report)?);
        }
        Ok(Self { by_kind })
    }

    fn records(&self, kind: MasterKind) -> &[MasterRecord] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    fn resolve(&self, kind: MasterKind, key: &str) -> Result<MasterId> {
        resolve_master(self.records(kind), kind, key).map(|record| record.id)
    }

    /// Empty key means "none".
    fn resolve_optional(&self, kind: MasterKind, key: &str) -> Result<Option<MasterId>> {
        if key.trim().is_empty() {
            return Ok(None);
        }
        self.resolve(kind, key).map(Some)
    }

    fn name(&self, kind: MasterKind, id: Option<MasterId>) -> &str {
        id.and_then(|id| self.records(kind).iter().find(|record| record.id == id))
            .map(|record| record.name.as_str())
            .unwrap_or("-")
    }

    fn filter(&self, view: &ViewArgs) -> Result<FilterState> {
        let optional = |kind, key: &Option<String>| -> Result<Option<MasterId>> {
            match key {
                Some(key) => self.resolve_optional(kind, key),
                None => Ok(None),
            }
        };
        Ok(FilterState {
            search: view.search.clone().unwrap_or_default(),
            category: optional(MasterKind::Category, &view.category)?,
            location: optional(MasterKind::Location, &view.location)?,
            include_disposed: view.include_disposed,
            sort: view.sort.into(),
        })
    }
}

fn field_edits(fields: FieldArgs, lookup: &MasterLookup) -> Result<Vec<ItemEdit>> {
    let mut edits = Vec::new();

    if let Some(name) = fields.name {
        edits.push(ItemEdit::Name(name));
    }
    let text_fields: [(Option<String>, fn(Option<String>) -> ItemEdit); 11] = [
        (fields.notes, ItemEdit::Notes),
        (fields.brand, ItemEdit::Brand),
        (fields.model_number, ItemEdit::ModelNumber),
        (fields.serial_number, ItemEdit::SerialNumber),
        (fields.purchase_store, ItemEdit::PurchaseStore),
        (fields.dimensions, ItemEdit::Dimensions),
        (fields.weight, ItemEdit::Weight),
        (fields.color, ItemEdit::Color),
        (fields.accessories, ItemEdit::Accessories),
        (fields.consumable, ItemEdit::ConsumableReplacement),
        (fields.link, ItemEdit::Link),
    ];
    for (value, edit) in text_fields {
        if let Some(value) = value {
            edits.push(edit(none_if_blank(value)));
        }
    }

    if let Some(date) = fields.purchase_date {
        edits.push(ItemEdit::PurchaseDate(parse_date(&date)?));
    }
    if let Some(date) = fields.warranty {
        edits.push(ItemEdit::WarrantyExpiration(parse_date(&date)?));
    }
    if let Some(price) = fields.price {
        edits.push(ItemEdit::PurchasePrice(parse_price(&price)));
    }
    if let Some(condition) = fields.condition {
        edits.push(ItemEdit::Condition(condition.into()));
    }
    for tag in &fields.add_tags {
        edits.push(ItemEdit::AddTag(lookup.resolve(MasterKind::Tag, tag)?));
    }
    for tag in &fields.remove_tags {
        edits.push(ItemEdit::RemoveTag(lookup.resolve(MasterKind::Tag, tag)?));
    }
    if let Some(disposed) = fields.disposed {
        edits.push(ItemEdit::Disposed(disposed));
    }

    Ok(edits)
}

fn run_add(args: AddArgs, items: &CliItemService<'_>, lookup: &MasterLookup) -> Result<()> {
    let category = args
        .category
        .as_deref()
        .map(|key| lookup.resolve_optional(MasterKind::Category, key))
        .transpose()?;
    let location = args
        .location
        .as_deref()
        .map(|key| lookup.resolve_optional(MasterKind::Location, key))
        .transpose()?;
    let defaults = FilterState {
        category: category.flatten(),
        location: location.flatten(),
        ..FilterState::default()
    };

    // An explicit empty value leaves the slot unset, as `item edit` does.
    let mut edits = Vec::new();
    if category == Some(None) {
        edits.push(ItemEdit::Category(None));
    }
    if location == Some(None) {
        edits.push(ItemEdit::Location(None));
    }
    edits.extend(field_edits(args.fields, lookup)?);

    let mut item = items.create_item(&defaults).map_err(report)?;
    if !edits.is_empty() {
        item = items.edit_item(item.id(), edits).map_err(report)?;
    }

    println!(
        "{} Created item {} {}",
        style("✓").green(),
        style(short_id(item.id())).cyan(),
        style(item.name()).yellow()
    );
    println!(
        "   {} / {}",
        lookup.name(MasterKind::Category, item.category_id()),
        lookup.name(MasterKind::Location, item.location_id())
    );
    Ok(())
}

fn run_show(args: ShowArgs, items: &CliItemService<'_>, lookup: &MasterLookup) -> Result<()> {
    let all = items.list_items().map_err(report)?;
    let item = resolve_item(&all, &args.item)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(item).into_diagnostic()?);
        return Ok(());
    }
    print_details(item, lookup);
    Ok(())
}

fn run_edit(args: EditArgs, items: &CliItemService<'_>, lookup: &MasterLookup) -> Result<()> {
    let all = items.list_items().map_err(report)?;
    let id = resolve_item(&all, &args.item)?.id();

    let mut edits = Vec::new();
    if let Some(key) = &args.category {
        edits.push(ItemEdit::Category(
            lookup.resolve_optional(MasterKind::Category, key)?,
        ));
    }
    if let Some(key) = &args.location {
        edits.push(ItemEdit::Location(
            lookup.resolve_optional(MasterKind::Location, key)?,
        ));
    }
    edits.extend(field_edits(args.fields, lookup)?);

    if edits.is_empty() {
        println!("{} Nothing to change", style("!").yellow());
        return Ok(());
    }

    let item = items.edit_item(id, edits).map_err(report)?;
    println!(
        "{} Updated item {} {}",
        style("✓").green(),
        style(short_id(item.id())).cyan(),
        style(item.name()).yellow()
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, items: &CliItemService<'_>, lookup: &MasterLookup) -> Result<()> {
    let all = items.list_items().map_err(report)?;
    let tag_names = items.tag_names().map_err(report)?;
    let targets = args
        .items
        .iter()
        .map(|key| resolve_item(&all, key).map(Item::id))
        .collect::<Result<Vec<ItemId>>>()?;

    let mut session = BrowseSession::with_filter(lookup.filter(&args.view)?);
    let visible = session.refresh(&all, &tag_names);
    session.select(targets.first().copied(), &visible);

    let removed = match targets.as_slice() {
        [single] => {
            items.delete_item(*single).map_err(report)?;
            1
        }
        many => items.delete_items(many).map_err(report)?,
    };
    session.after_delete(&targets, &visible);

    println!(
        "{} Deleted {} item{}",
        style("✓").green(),
        style(removed).cyan(),
        if removed == 1 { "" } else { "s" }
    );
    if let Some(next) = session
        .selected()
        .and_then(|id| visible.iter().find(|item| item.id() == id))
    {
        println!(
            "   Next: {} {}",
            style(short_id(next.id())).cyan(),
            next.name()
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, items: &CliItemService<'_>, lookup: &MasterLookup) -> Result<()> {
    let filter = lookup.filter(&args.view)?;
    let visible = items.visible_items(&filter).map_err(report)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible).into_diagnostic()?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<28} {:<16} {:<16} {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("CATEGORY").bold(),
        style("LOCATION").bold(),
        style("UPDATED").bold()
    );
    for item in &visible {
        let name = if item.is_disposed() {
            style(format!("{} [disposed]", item.name())).dim()
        } else {
            style(item.name().to_string())
        };
        println!(
            "{:<10} {:<28} {:<16} {:<16} {}",
            style(short_id(item.id())).cyan(),
            name,
            lookup.name(MasterKind::Category, item.category_id()),
            lookup.name(MasterKind::Location, item.location_id()),
            format_timestamp(item.updated_at())
        );
    }
    println!();
    println!("{} item(s) found.", style(visible.len()).cyan());
    Ok(())
}

fn print_details(item: &Item, lookup: &MasterLookup) {
    let tags = item
        .tag_ids()
        .iter()
        .map(|id| lookup.name(MasterKind::Tag, Some(*id)))
        .collect::<Vec<_>>()
        .join(", ");
    let text = |value: Option<&str>| value.unwrap_or("-").to_string();
    let date = |value: Option<chrono::NaiveDate>| {
        value.map_or_else(|| "-".to_string(), |date| date.to_string())
    };

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(item.id()).cyan());
    println!("{}: {}", style("Name").bold(), style(item.name()).yellow());
    let rows = [
        ("Category", lookup.name(MasterKind::Category, item.category_id()).to_string()),
        ("Location", lookup.name(MasterKind::Location, item.location_id()).to_string()),
        ("Tags", if tags.is_empty() { "-".to_string() } else { tags }),
        ("Condition", item.condition().as_str().to_string()),
        ("Brand", text(item.brand())),
        ("Model", text(item.model_number())),
        ("Serial", text(item.serial_number())),
        ("Purchased", date(item.purchase_date())),
        ("Store", text(item.purchase_store())),
        (
            "Price",
            item.purchase_price()
                .map_or_else(|| "-".to_string(), |price| price.to_string()),
        ),
        ("Warranty until", date(item.warranty_expiration())),
        ("Dimensions", text(item.dimensions())),
        ("Weight", text(item.weight())),
        ("Color", text(item.color())),
        ("Accessories", text(item.accessories())),
        ("Consumables", text(item.consumable_replacement())),
        ("Link", text(item.link())),
        ("Notes", text(item.notes())),
        ("Created", format_timestamp(item.created_at())),
        ("Updated", format_timestamp(item.updated_at())),
    ];
    for (label, value) in rows {
        println!("{}: {}", style(label).bold(), value);
    }
    if let Some(at) = item.disposed_at() {
        println!(
            "{}: {}",
            style("Disposed").bold(),
            style(format_timestamp(at)).red()
        );
    }
    println!("{}", style("─".repeat(60)).dim());
}
