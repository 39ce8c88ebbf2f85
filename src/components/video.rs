use crate::Result;
use crate::dom::{Dom, NodeId};

/// `#bgVideo` in the hero section. Playback is a flag: the page model only
/// tracks whether the video would be running.
#[derive(Debug, Clone)]
pub(crate) struct BackgroundVideo {
    pub(crate) node: NodeId,
    hero: Option<NodeId>,
    playing: bool,
}

impl BackgroundVideo {
    pub(crate) fn bind(dom: &Dom) -> Result<Option<Self>> {
        let Some(node) = dom.by_id("bgVideo") else {
            return Ok(None);
        };
        Ok(Some(Self {
            node,
            hero: dom.closest(node, ".hero")?,
            playing: false,
        }))
    }

    pub(crate) fn playing(&self) -> bool {
        self.playing
    }

    /// Starts playback if the platform allows it. Returns whether it started.
    pub(crate) fn play(&mut self, autoplay_allowed: bool) -> bool {
        self.playing = autoplay_allowed;
        autoplay_allowed
    }

    pub(crate) fn pause(&mut self) {
        self.playing = false;
    }

    /// Static hero background for when autoplay is blocked.
    pub(crate) fn apply_fallback(&self, dom: &mut Dom) -> Result<()> {
        match self.hero {
            Some(hero) => dom.class_add(hero, "video-fallback"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    #[test]
    fn fallback_marks_enclosing_hero() -> Result<()> {
        let mut dom = parse_html(
            "<section class='hero' id='h'><div><video id='bgVideo'></video></div></section>",
        )?;
        let mut video = BackgroundVideo::bind(&dom)?.expect("video");
        assert!(!video.play(false));
        video.apply_fallback(&mut dom)?;
        assert!(dom.class_contains(dom.by_id("h").expect("hero"), "video-fallback"));

        assert!(video.play(true));
        video.pause();
        assert!(!video.playing());
        Ok(())
    }

    #[test]
    fn video_outside_hero_has_no_fallback_target() -> Result<()> {
        let mut dom = parse_html("<video id='bgVideo'></video>")?;
        let video = BackgroundVideo::bind(&dom)?.expect("video");
        video.apply_fallback(&mut dom)?;
        assert!(dom.query_selector(".video-fallback")?.is_none());
        Ok(())
    }
}
