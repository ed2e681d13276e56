use crate::{
    foundation::error::{KeyplayError, KeyplayResult},
    scene::{
        config::{AnimationConfig, PlayerOptions},
        fetch::{Fetch, fetch_json},
        playback::Playback,
        tween::Tween,
    },
    svg::{document::NodeId, groups::TransformGroup, groups::decompose},
    toolkit::{SvgToolkit, TweenId},
};

/// The loaded illustration and the tweens attached to it.
#[derive(Clone, Debug)]
pub struct SceneHandle {
    container: NodeId,
    svg: NodeId,
    groups: Vec<TransformGroup>,
    tweens: Vec<Tween>,
}

impl SceneHandle {
    /// Canvas node the SVG was appended to.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Root element of the loaded SVG.
    pub fn svg(&self) -> NodeId {
        self.svg
    }

    /// Group chains created for animated elements, in animation order.
    pub fn groups(&self) -> &[TransformGroup] {
        &self.groups
    }

    /// Tween registry, in creation order. `tweens()[i].id() == TweenId(i)`.
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn into_playback(self) -> Playback {
        Playback::new(self.tweens)
    }
}

/// Two-phase loader: configuration first, then the scene, then the animations.
pub struct SceneLoader<'a> {
    fetch: &'a dyn Fetch,
    options: PlayerOptions,
    config: Option<AnimationConfig>,
}

impl<'a> SceneLoader<'a> {
    pub fn new(fetch: &'a dyn Fetch, options: PlayerOptions) -> Self {
        Self {
            fetch,
            options,
            config: None,
        }
    }

    /// Options as merged so far.
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn config(&self) -> Option<&AnimationConfig> {
        self.config.as_ref()
    }

    /// Fetch the JSON named by `data` (when set), merge it over the current options and resolve.
    #[tracing::instrument(skip(self), fields(data = self.options.data.as_deref()))]
    pub fn load_config(&mut self) -> KeyplayResult<&AnimationConfig> {
        if let Some(location) = self.options.data.clone() {
            let json: PlayerOptions = fetch_json(self.fetch, &location)?;
            self.options.merge(json);
        }
        let config = self.options.resolve()?;
        tracing::info!(
            svg = %config.svg,
            duration_ms = config.duration_ms,
            steps = config.steps,
            animations = config.animations.len(),
            "config loaded"
        );
        Ok(self.config.insert(config))
    }

    fn require_config(&self) -> KeyplayResult<&AnimationConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| KeyplayError::validation("load_config must run before loading the scene"))
    }

    /// Fetch the SVG and append it under the canvas container. Nothing is animated yet.
    #[tracing::instrument(skip(self, toolkit))]
    pub fn load_scene(&self, toolkit: &mut dyn SvgToolkit) -> KeyplayResult<SceneHandle> {
        let config = self.require_config()?;
        let root = toolkit.document().root();
        let container = match config.canvas.as_deref() {
            None => root,
            Some(selector) => toolkit
                .select(root, selector)?
                .ok_or_else(|| KeyplayError::element_not_found(selector))?,
        };

        let bytes = self.fetch.fetch(&config.svg)?;
        let svg = toolkit.load(container, &bytes)?;
        tracing::info!(svg = %config.svg, bytes = bytes.len(), "svg loaded");

        Ok(SceneHandle {
            container,
            svg,
            groups: Vec::new(),
            tweens: Vec::new(),
        })
    }

    /// Decompose every animated element and start one tween per present keyframe list.
    ///
    /// All selectors are resolved before the document is touched, so an unknown selector leaves
    /// the scene unchanged.
    #[tracing::instrument(skip(self, toolkit, scene))]
    pub fn attach_animations(
        &self,
        toolkit: &mut dyn SvgToolkit,
        scene: &mut SceneHandle,
    ) -> KeyplayResult<()> {
        let config = self.require_config()?;
        let duration_step = config.duration_step();

        let mut targets = Vec::with_capacity(config.animations.len());
        for spec in &config.animations {
            let element = toolkit
                .select(scene.svg, &spec.id)?
                .ok_or_else(|| KeyplayError::element_not_found(&spec.id))?;
            targets.push((spec, element, spec.tracks()?));
        }

        for (spec, element, tracks) in targets {
            let Some(groups) = decompose(toolkit.document_mut(), element)? else {
                tracing::warn!(id = %spec.id, "selector matched a non-element, skipping");
                continue;
            };
            scene.groups.push(groups);

            for track in tracks {
                let id = TweenId(scene.tweens.len());
                let mut tween = Tween::new(toolkit, id, &groups, track, duration_step)?;
                tween.advance(toolkit);
                scene.tweens.push(tween);
            }
        }

        tracing::info!(
            elements = scene.groups.len(),
            tweens = scene.tweens.len(),
            "animations attached"
        );
        Ok(())
    }
}

/// Convenience entry point running every loading phase in order.
#[derive(Clone, Debug)]
pub struct SvgAnimation {
    config: AnimationConfig,
    container: NodeId,
    svg: NodeId,
    groups: Vec<TransformGroup>,
    playback: Playback,
}

impl SvgAnimation {
    /// Load config, scene and animations; the returned playback has every tween started.
    pub fn open(
        fetch: &dyn Fetch,
        options: PlayerOptions,
        toolkit: &mut dyn SvgToolkit,
    ) -> KeyplayResult<Self> {
        let mut loader = SceneLoader::new(fetch, options);
        let config = loader.load_config()?.clone();
        let mut scene = loader.load_scene(toolkit)?;
        loader.attach_animations(toolkit, &mut scene)?;
        let SceneHandle {
            container,
            svg,
            groups,
            tweens,
        } = scene;
        Ok(Self {
            config,
            container,
            svg,
            groups,
            playback: Playback::new(tweens),
        })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn svg(&self) -> NodeId {
        self.svg
    }

    pub fn groups(&self) -> &[TransformGroup] {
        &self.groups
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn into_playback(self) -> Playback {
        self.playback
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/loader.rs"]
mod tests;
