use macroquad::prelude::*;

use crate::assets::Sprites;
use crate::entities::{ExitZone, Facing};
use crate::game::{Game, Screen, PLAY_BUTTON, PLAY_HEIGHT, PLAY_WIDTH};
use crate::generator::exit_gap;

const GOLD: Color = Color::new(1.0, 0.843, 0.0, 1.0);
const PICKUP_SHADES: [(u8, u8, u8); 3] = [(100, 150, 255), (120, 170, 255), (140, 190, 255)];

const BOX_HEIGHT: f32 = 120.0;
const BOX_MARGIN: f32 = 50.0;

pub fn draw(game: &Game, sprites: &Sprites) {
    clear_background(BLACK);
    match game.screen {
        Screen::Menu => draw_menu(game, sprites),
        Screen::Dialogue => draw_dialogue(game, sprites),
        Screen::Playing => {
            draw_level(game, sprites);
            draw_hud(game, sprites);
            if game.is_terminal() {
                draw_terminal(game, sprites);
            }
        }
    }
    if game.rules.show_debug_overlay {
        debug_draw(game);
    }
}

fn draw_full(texture: &Texture2D) {
    draw_texture_ex(
        texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(PLAY_WIDTH, PLAY_HEIGHT)),
            ..Default::default()
        },
    );
}

fn draw_sprite(texture: &Texture2D, rect: &Rect, facing: Facing) {
    draw_texture_ex(
        texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(rect.w, rect.h)),
            flip_x: facing.flipped(),
            ..Default::default()
        },
    );
}

fn draw_centered(text: &str, y: f32, size: u16, color: Color) {
    let dims = measure_text(text, None, size, 1.0);
    draw_text(text, (PLAY_WIDTH - dims.width) / 2.0, y, size as f32, color);
}

fn draw_menu(game: &Game, sprites: &Sprites) {
    match &sprites.menu {
        Some(bg) => draw_full(bg),
        None => {
            let fill = Color::from_rgba(15, 12, 30, 255);
            draw_rectangle(0.0, 0.0, PLAY_WIDTH, PLAY_HEIGHT, fill);
        }
    }
    draw_text("ODYSSEY", 95.0, 160.0, 72.0, GOLD);
    draw_text("Le Retour du Roi", 100.0, 200.0, 28.0, LIGHTGRAY);

    let b = PLAY_BUTTON;
    let border = if game.menu_hovered { GOLD } else { WHITE };
    draw_rectangle(b.x, b.y, b.w, b.h, Color::from_rgba(30, 30, 55, 220));
    draw_rectangle_lines(b.x, b.y, b.w, b.h, 4.0, border);
    let label = "PLAY";
    let dims = measure_text(label, None, 40, 1.0);
    draw_text(
        label,
        b.x + (b.w - dims.width) / 2.0,
        b.y + (b.h + dims.offset_y) / 2.0,
        40.0,
        border,
    );
}

fn draw_dialogue(game: &Game, sprites: &Sprites) {
    draw_full(sprites.background(game.level.biome));

    let Some((speaker, line)) = game.dialogue.current() else {
        return;
    };

    let box_y = PLAY_HEIGHT - BOX_HEIGHT - 20.0;
    if let Some(portrait) = sprites.portrait(speaker) {
        let image = vec2(portrait.width(), portrait.height());
        let slot = speaker.portrait_slot(image, vec2(PLAY_WIDTH, PLAY_HEIGHT));
        draw_texture_ex(
            portrait,
            slot.x,
            slot.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(slot.w, slot.h)),
                ..Default::default()
            },
        );
    }

    let box_w = PLAY_WIDTH - 2.0 * BOX_MARGIN;
    draw_rectangle(BOX_MARGIN, box_y, box_w, BOX_HEIGHT, Color::from_rgba(20, 20, 40, 200));
    draw_rectangle_lines(BOX_MARGIN, box_y, box_w, BOX_HEIGHT, 3.0, WHITE);
    draw_text(speaker.display_name(), BOX_MARGIN + 20.0, box_y + 30.0, 28.0, GOLD);

    let lines = wrap_text(line, box_w - 40.0, |s| measure_text(s, None, 22, 1.0).width);
    for (i, text) in lines.iter().enumerate() {
        draw_text(text, BOX_MARGIN + 20.0, box_y + 58.0 + i as f32 * 24.0, 22.0, WHITE);
    }
    let hint = format!(
        "{}/{}  Press SPACE to continue...",
        game.dialogue.cursor() + 1,
        game.dialogue.len()
    );
    draw_text(
        &hint,
        PLAY_WIDTH - BOX_MARGIN - 280.0,
        PLAY_HEIGHT - 8.0,
        18.0,
        GRAY,
    );
}

fn draw_level(game: &Game, sprites: &Sprites) {
    let level = &game.level;
    draw_full(sprites.background(level.biome));

    let tile = game.rules.tile_size.max(1) as f32;
    for platform in &level.platforms {
        let r = platform.rect;
        let mut x = r.x;
        while x < r.x + r.w {
            draw_texture_ex(
                &sprites.tile,
                x,
                r.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(tile.min(r.x + r.w - x), r.h)),
                    ..Default::default()
                },
            );
            x += tile;
        }
    }

    draw_exit(&level.exit);

    for pickup in &level.pickups {
        match &sprites.pickup {
            Some(t) => draw_sprite(t, &pickup.rect, Facing::Right),
            None => {
                let (r, g, b) = PICKUP_SHADES[pickup.shade().min(2)];
                let p = pickup.rect;
                draw_rectangle(p.x, p.y, p.w, p.h, Color::from_rgba(r, g, b, 255));
            }
        }
    }

    for pursuer in &level.pursuers {
        match sprites.pursuer(level.biome) {
            Some(t) => draw_sprite(t, &pursuer.rect, pursuer.facing),
            None => {
                let p = pursuer.rect;
                draw_rectangle(p.x, p.y, p.w, p.h, RED);
            }
        }
    }

    let player = game.player.rect();
    match &sprites.player {
        Some(t) => draw_sprite(t, &player, game.player.facing),
        None => draw_rectangle(player.x, player.y, player.w, player.h, BLUE),
    }
}

fn draw_exit(exit: &ExitZone) {
    let glow = exit.glow();
    let color = Color::from_rgba(
        (100.0 + glow * 100.0) as u8,
        (200.0 + glow * 55.0) as u8,
        (100.0 + glow * 100.0) as u8,
        255,
    );
    let r = exit.rect;
    draw_rectangle(r.x, r.y, r.w, r.h, color);
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 4.0, GRAY);
    let inner = Color::new(1.0, 1.0, 1.0, 0.25 + glow * 0.25);
    draw_rectangle(r.x + 8.0, r.y + 8.0, r.w - 16.0, r.h - 16.0, inner);
}

fn draw_hud(game: &Game, sprites: &Sprites) {
    match &sprites.heart {
        Some(heart) => {
            for i in 0..game.player.lives {
                draw_texture_ex(
                    heart,
                    20.0 + i as f32 * 55.0,
                    20.0,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(48.0, 48.0)),
                        ..Default::default()
                    },
                );
            }
        }
        None => {
            draw_text(&format!("Lives: {}", game.player.lives), 20.0, 48.0, 32.0, WHITE);
        }
    }

    let per = game.rules.levels_per_biome;
    let label = format!(
        "{} - Level {}/{}",
        game.level.biome.name(),
        game.level.level_in_biome(per),
        per
    );
    draw_text(&label, PLAY_WIDTH - 500.0, 48.0, 32.0, WHITE);
}

fn draw_terminal(game: &Game, sprites: &Sprites) {
    let (image, title, color) = if game.victory {
        (&sprites.victory, "VICTORY!", GOLD)
    } else {
        (&sprites.game_over, "GAME OVER", RED)
    };
    match image {
        Some(t) => draw_full(t),
        None => draw_rectangle(0.0, 0.0, PLAY_WIDTH, PLAY_HEIGHT, BLACK),
    }
    draw_centered(title, PLAY_HEIGHT / 2.0 - 20.0, 80, color);
    draw_centered("Press R to restart", PLAY_HEIGHT / 2.0 + 50.0, 32, WHITE);
}

/// Bounding boxes of everything that collides, plus a status line.
fn debug_draw(game: &Game) {
    if game.screen != Screen::Playing {
        return;
    }
    let level = &game.level;
    for p in &level.platforms {
        draw_rectangle_lines(p.rect.x, p.rect.y, p.rect.w, p.rect.h, 1.0, GREEN);
    }
    for p in &level.pickups {
        draw_rectangle_lines(p.rect.x, p.rect.y, p.rect.w, p.rect.h, 1.0, YELLOW);
    }
    for p in &level.pursuers {
        draw_rectangle_lines(p.rect.x, p.rect.y, p.rect.w, p.rect.h, 1.0, RED);
    }
    let e = level.exit.rect;
    draw_rectangle_lines(e.x, e.y, e.w, e.h, 1.0, ORANGE);
    let gap = exit_gap(&game.bounds, game.rules.tile_size);
    draw_rectangle_lines(gap.x, gap.y, gap.w, gap.h, 1.0, PINK);
    let r = game.player.rect();
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, BLUE);

    let body = &game.player.body;
    let status = format!(
        "fps {} | level {} biome {} | v ({:.1}, {:.1}) | jumps {} | grounded {}",
        get_fps(),
        level.number,
        level.biome.number(),
        body.velocity.x,
        body.velocity.y,
        body.jump_count,
        body.grounded,
    );
    draw_text(&status, 20.0, PLAY_HEIGHT - 6.0, 18.0, GREEN);
}

/// Greedy word wrap. A single word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("the wine dark sea rolls on", 120.0, chars);
        assert_eq!(lines, vec!["the wine", "dark sea", "rolls on"]);
        assert!(lines.iter().all(|l| chars(l) <= 120.0));
    }

    #[test]
    fn long_word_stands_alone() {
        let lines = wrap_text("a extraordinarily b", 50.0, chars);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("   ", 100.0, chars).is_empty());
    }
}
