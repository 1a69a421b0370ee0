//! Conversion of poll display payloads into serenity builders.

use serenity::all::{
    CreateActionRow, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption,
};

use crate::model::view::{PollSelect, PollView};

pub fn build_embed(view: &PollView) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .author(CreateEmbedAuthor::new(&view.author))
        .title(&view.title)
        .color(view.color);

    for field in &view.fields {
        embed = embed.field(&field.name, &field.value, false);
    }

    if let Some(footer) = &view.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }

    embed
}

fn build_select(select: &PollSelect) -> CreateSelectMenu {
    let options = select
        .options
        .iter()
        .map(|(label, value)| CreateSelectMenuOption::new(label, value))
        .collect();

    CreateSelectMenu::new(&select.custom_id, CreateSelectMenuKind::String { options })
        .placeholder(&select.placeholder)
        .min_values(select.min_values)
        .max_values(select.max_values)
        .disabled(select.disabled)
}

pub fn build_components(view: &PollView) -> Vec<CreateActionRow> {
    view.select
        .iter()
        .map(|select| CreateActionRow::SelectMenu(build_select(select)))
        .collect()
}
