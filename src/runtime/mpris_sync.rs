use crate::app::App;
use crate::audio::PlaybackInfo;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App, snapshot: &PlaybackInfo) {
    mpris.set_now_playing(snapshot.title.clone(), snapshot.url.clone());
    mpris.set_playback(app.playback);
}
