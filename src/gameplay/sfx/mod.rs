use crate::config::{GameConfig, SfxConfig};
use crate::gameplay::{EngineCueMessage, NodeClickCueMessage};
use crate::states::GameState;
use bevy::audio::{AudioPlayer, AudioSink, AudioSinkPlayback, PlaybackSettings, Volume};
use bevy::prelude::*;

pub struct GameplaySfxPlugin;

impl Plugin for GameplaySfxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_engine_cues, play_node_clicks).run_if(resource_exists::<GameConfig>),
        )
        .add_systems(OnEnter(GameState::Menu), pause_engine_loop)
        .add_systems(OnEnter(GameState::Playing), resume_engine_loop);
    }
}

#[derive(Component)]
struct EngineLoopAudio;

fn apply_engine_cues(
    mut commands: Commands,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut cues: MessageReader<EngineCueMessage>,
    existing_query: Query<Entity, With<EngineLoopAudio>>,
) {
    for cue in cues.read() {
        match cue {
            EngineCueMessage::Started => {
                if !config.game.sfx.enabled || !existing_query.is_empty() {
                    continue;
                }
                commands.spawn((
                    Name::new("SfxEngineLoop"),
                    EngineLoopAudio,
                    AudioPlayer::new(asset_server.load(config.game.sfx.engine_loop.clone())),
                    PlaybackSettings::LOOP
                        .with_volume(Volume::Linear(engine_volume(&config.game.sfx))),
                ));
                debug!("Engine loop started.");
            }
            EngineCueMessage::Stopped => {
                for entity in &existing_query {
                    commands.entity(entity).try_despawn();
                }
            }
        }
    }
}

// Several clicks in one frame still play a single sound.
fn play_node_clicks(
    mut commands: Commands,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut cues: MessageReader<NodeClickCueMessage>,
) {
    if cues.read().count() == 0 || !config.game.sfx.enabled {
        return;
    }
    commands.spawn((
        Name::new("SfxNodeClick"),
        AudioPlayer::new(asset_server.load(config.game.sfx.node_click.clone())),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(click_volume(&config.game.sfx))),
    ));
}

fn pause_engine_loop(mut sinks: Query<&mut AudioSink, With<EngineLoopAudio>>) {
    for mut sink in &mut sinks {
        sink.pause();
    }
}

fn resume_engine_loop(mut sinks: Query<&mut AudioSink, With<EngineLoopAudio>>) {
    for mut sink in &mut sinks {
        sink.play();
    }
}

fn engine_volume(sfx: &SfxConfig) -> f32 {
    (sfx.master_volume * sfx.engine_volume).max(0.0)
}

fn click_volume(sfx: &SfxConfig) -> f32 {
    (sfx.master_volume * sfx.click_volume).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sfx(master_volume: f32) -> SfxConfig {
        SfxConfig {
            enabled: true,
            engine_loop: "audio/engine_loop.wav".to_string(),
            node_click: "audio/node_click.wav".to_string(),
            master_volume,
            engine_volume: 0.5,
            click_volume: 0.25,
        }
    }

    #[test]
    fn channel_volumes_scale_with_master() {
        let config = sfx(0.8);
        assert!((engine_volume(&config) - 0.4).abs() < 1e-6);
        assert!((click_volume(&config) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn negative_master_volume_is_silent() {
        let config = sfx(-1.0);
        assert_eq!(engine_volume(&config), 0.0);
        assert_eq!(click_volume(&config), 0.0);
    }
}
